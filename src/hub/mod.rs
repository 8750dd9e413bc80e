//! Message-Routing Hub
//!
//! The real-time core: a single control-loop task owning all routing
//! state, reached only through message-passing queues. No other
//! component reads or writes the membership registry.

pub mod connection;
pub mod events;
pub mod registry;
pub mod router;

pub use connection::{Connection, ConnectionHandle, ConnectionId, DEFAULT_OUTBOUND_CAPACITY};
pub use events::{BroadcastRequest, MembershipCommand, Notification, Outbound};
pub use router::{HubHandle, MessageHub};
