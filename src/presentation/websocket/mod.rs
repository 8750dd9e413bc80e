//! WebSocket Gateway
//!
//! The connection adapter between the wire and the hub.

pub mod frames;
pub mod handler;

pub use frames::{ClientFrame, FrameError, IncomingMessage};
pub use handler::ws_handler;
