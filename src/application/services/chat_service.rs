//! Chat Service
//!
//! The surface the connection adapter and CRUD handlers compose around
//! the hub: connect/disconnect lifecycle, persist-then-broadcast message
//! sending, and the membership operations.
//!
//! Hub submissions are fire-and-forget; every error this service returns
//! was raised before the hub was involved (membership lookups, message
//! persistence), so a failed request never leaves the hub in a partial
//! state.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ChatMessage, MembershipRepository, MessageRepository, MAX_CONTENT_LENGTH};
use crate::hub::{BroadcastRequest, Connection, HubHandle, Notification};
use crate::shared::error::AppError;

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] AppError),
}

pub struct ChatService {
    hub: HubHandle,
    messages: Arc<dyn MessageRepository>,
    memberships: Arc<dyn MembershipRepository>,
    outbound_capacity: usize,
}

impl ChatService {
    pub fn new(
        hub: HubHandle,
        messages: Arc<dyn MessageRepository>,
        memberships: Arc<dyn MembershipRepository>,
        outbound_capacity: usize,
    ) -> Self {
        Self {
            hub,
            messages,
            memberships,
            outbound_capacity,
        }
    }

    /// Open a connection for an authenticated user: look up the current
    /// membership snapshot, register with the hub, and announce presence.
    pub async fn connect(&self, user_id: Uuid) -> Result<Connection, ChatError> {
        let server_ids = self.memberships.user_server_ids(user_id).await?;
        let channel_ids = self.memberships.user_channel_ids(user_id).await?;

        let (handle, connection) = Connection::open(user_id, self.outbound_capacity);
        tracing::debug!(
            connection_id = %connection.id(),
            user_id = %user_id,
            "opening connection"
        );

        self.hub.register(handle, server_ids, channel_ids).await;
        self.hub
            .dispatch(BroadcastRequest::Notification(Notification::Connected {
                user_id,
            }))
            .await;

        Ok(connection)
    }

    /// Tear down a connection: evict it from every routing set and
    /// announce the departure. Safe to call once per connection.
    pub async fn disconnect(&self, connection: &Connection) {
        self.hub.unregister(connection.id()).await;
        self.hub
            .dispatch(BroadcastRequest::Notification(Notification::Disconnected {
                user_id: connection.user_id(),
            }))
            .await;
    }

    /// Persist a chat message, then broadcast it to the target channel.
    ///
    /// The broadcast is only issued after the store accepted the message;
    /// a persistence failure produces zero dispatched payloads.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        server_id: Option<Uuid>,
        channel_id: Uuid,
        content: String,
        attachment: Option<String>,
    ) -> Result<(), ChatError> {
        // The adapter validates frames too; this guards direct callers.
        if content.is_empty() || content.chars().count() as u64 > MAX_CONTENT_LENGTH {
            return Err(ChatError::Validation(format!(
                "content must be 1 to {MAX_CONTENT_LENGTH} characters"
            )));
        }

        let message = ChatMessage::new(server_id, channel_id, sender_id, content, attachment);

        self.messages.create(&message).await?;

        self.hub
            .dispatch(BroadcastRequest::Channel {
                channel_id,
                message,
            })
            .await;

        Ok(())
    }

    /// Join additional channels within a server.
    pub async fn join_channels(
        &self,
        connection: &Connection,
        server_id: Uuid,
        channel_ids: Vec<Uuid>,
    ) {
        self.hub
            .join_channels(connection.id(), server_id, channel_ids.clone())
            .await;
        self.notify(Notification::ChannelsJoined {
            user_id: connection.user_id(),
            server_id,
            channel_ids,
        })
        .await;
    }

    pub async fn quit_channel(&self, connection: &Connection, channel_id: Uuid) {
        self.hub.quit_channel(connection.id(), channel_id).await;
        self.notify(Notification::ChannelQuit {
            user_id: connection.user_id(),
            channel_id,
        })
        .await;
    }

    /// Leave one server's routing set. Channel memberships are quit
    /// individually by the caller, mirroring the membership hierarchy.
    pub async fn quit_server(&self, connection: &Connection, server_id: Uuid) {
        self.hub.quit_server(connection.id(), server_id).await;
        self.notify(Notification::ServerQuit {
            user_id: connection.user_id(),
            server_id,
        })
        .await;
    }

    /// Administrative channel deletion: evict every live listener.
    pub async fn remove_channel(&self, channel_id: Uuid) {
        self.hub.remove_channel(channel_id).await;
        self.notify(Notification::ChannelRemoved { channel_id }).await;
    }

    /// Administrative server deletion. Channel sets are untouched.
    pub async fn remove_server(&self, server_id: Uuid) {
        self.hub.remove_server(server_id).await;
        self.notify(Notification::ServerRemoved { server_id }).await;
    }

    async fn notify(&self, notification: Notification) {
        self.hub
            .dispatch(BroadcastRequest::Notification(notification))
            .await;
    }
}
