//! Repository Implementations

pub mod membership_repository;
pub mod message_repository;

pub use membership_repository::PgMembershipRepository;
pub use message_repository::PgMessageRepository;
