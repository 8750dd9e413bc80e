//! Message Routing Tests
//!
//! End-to-end scenarios driven through the chat service and the hub.

mod fanout_tests;
