//! Membership repository trait.
//!
//! Supplies the server/channel membership snapshot that seeds a newly
//! connected client's routing registration.

use async_trait::async_trait;
use uuid::Uuid;

use crate::shared::error::AppError;

/// Repository trait for membership lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Ids of every server the user belongs to.
    async fn user_server_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Ids of every channel the user belongs to, across servers and
    /// direct conversations.
    async fn user_channel_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;
}
