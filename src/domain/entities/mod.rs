//! Domain Entities
//!
//! Core business entities and their repository traits.

pub mod membership;
pub mod message;

pub use membership::MembershipRepository;
pub use message::{ChatMessage, MessageRecord, MessageRepository, MAX_CONTENT_LENGTH};

#[cfg(test)]
pub use membership::MockMembershipRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
