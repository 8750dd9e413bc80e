//! Presentation Layer
//!
//! HTTP routes and the WebSocket connection adapter.

pub mod http;
pub mod middleware;
pub mod websocket;
