//! Domain Layer
//!
//! Entities and the repository traits the infrastructure implements.

pub mod entities;

pub use entities::{
    ChatMessage, MembershipRepository, MessageRecord, MessageRepository, MAX_CONTENT_LENGTH,
};

#[cfg(test)]
pub use entities::{MockMembershipRepository, MockMessageRepository};
