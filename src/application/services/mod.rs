//! Application Services

pub mod auth_service;
pub mod chat_service;

pub use auth_service::{AuthError, AuthService, JwtAuthService};
pub use chat_service::{ChatError, ChatService};
