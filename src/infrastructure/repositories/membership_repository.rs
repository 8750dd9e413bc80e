//! PostgreSQL Membership Repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::MembershipRepository;
use crate::shared::error::AppError;

/// PostgreSQL implementation of MembershipRepository
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn user_server_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT server_id FROM server_members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn user_channel_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        // Channel ids from both server channels and direct conversations.
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT channel_id FROM server_channel_members WHERE user_id = $1
            UNION ALL
            SELECT channel_id FROM dm_channel_members WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
