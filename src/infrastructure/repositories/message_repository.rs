//! PostgreSQL Message Repository

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::{ChatMessage, MessageRepository};
use crate::shared::error::AppError;

/// PostgreSQL implementation of MessageRepository.
///
/// Server and direct messages land in separate tables with the same
/// column layout, selected by the message variant.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &ChatMessage) -> Result<(), AppError> {
        match message {
            ChatMessage::Server { server_id, record } => {
                sqlx::query(
                    r#"
                    INSERT INTO server_messages
                        (id, server_id, channel_id, sender_id, content, attachment, sent_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(record.id)
                .bind(server_id)
                .bind(record.channel_id)
                .bind(record.sender_id)
                .bind(&record.content)
                .bind(&record.attachment)
                .bind(record.sent_at)
                .bind(record.updated_at)
                .execute(&self.pool)
                .await?;
            }
            ChatMessage::Direct { record } => {
                sqlx::query(
                    r#"
                    INSERT INTO direct_messages
                        (id, channel_id, sender_id, content, attachment, sent_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(record.id)
                .bind(record.channel_id)
                .bind(record.sender_id)
                .bind(&record.content)
                .bind(&record.attachment)
                .bind(record.sent_at)
                .bind(record.updated_at)
                .execute(&self.pool)
                .await?;
            }
        }

        Ok(())
    }
}
