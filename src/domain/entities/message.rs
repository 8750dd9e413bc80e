//! Chat message entity and repository trait.
//!
//! The source data model stores server-channel messages and direct
//! messages in separate tables that share one column layout. That shape
//! is expressed here as a two-variant sum over a common record, and
//! every consumer dispatches on the variant by pattern matching.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Maximum chat message length in characters, enforced both at the wire
/// frame and in the service.
pub const MAX_CONTENT_LENGTH: u64 = 4000;

/// The column layout shared by both message variants.
///
/// Maps to the `server_messages` / `direct_messages` tables:
/// - id: UUID PRIMARY KEY
/// - channel_id: UUID NOT NULL
/// - sender_id: UUID NOT NULL
/// - content: TEXT NOT NULL
/// - attachment: TEXT NULL
/// - sent_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,

    /// Channel the message was sent to
    pub channel_id: Uuid,

    /// Authenticated author; never taken from the wire
    pub sender_id: Uuid,

    pub content: String,

    /// Optional attachment URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,

    pub sent_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A persisted chat message, either inside a server or in a direct
/// conversation. Serializes flat: the server variant carries an extra
/// `server_id` field next to the shared record columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatMessage {
    Server {
        server_id: Uuid,
        #[serde(flatten)]
        record: MessageRecord,
    },
    Direct {
        #[serde(flatten)]
        record: MessageRecord,
    },
}

impl ChatMessage {
    /// Build a message from an inbound request, stamping identity and
    /// timestamps. A `server_id` selects the server variant.
    pub fn new(
        server_id: Option<Uuid>,
        channel_id: Uuid,
        sender_id: Uuid,
        content: String,
        attachment: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let record = MessageRecord {
            id: Uuid::new_v4(),
            channel_id,
            sender_id,
            content,
            attachment,
            sent_at: now,
            updated_at: now,
        };

        match server_id {
            Some(server_id) => Self::Server { server_id, record },
            None => Self::Direct { record },
        }
    }

    /// The shared record regardless of variant.
    pub fn record(&self) -> &MessageRecord {
        match self {
            Self::Server { record, .. } => record,
            Self::Direct { record } => record,
        }
    }

    pub fn channel_id(&self) -> Uuid {
        self.record().channel_id
    }

    pub fn sender_id(&self) -> Uuid {
        self.record().sender_id
    }

    /// Server id for server messages, `None` for direct messages.
    pub fn server_id(&self) -> Option<Uuid> {
        match self {
            Self::Server { server_id, .. } => Some(*server_id),
            Self::Direct { .. } => None,
        }
    }
}

/// Repository trait for durable message storage.
///
/// The hub never broadcasts a message that was not first accepted here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message.
    async fn create(&self, message: &ChatMessage) -> Result<(), AppError>;
}
