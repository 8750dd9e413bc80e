//! Application Layer
//!
//! Services composing the hub with the persistence and auth ports.

pub mod services;

pub use services::{AuthError, AuthService, ChatError, ChatService, JwtAuthService};
