//! Hub command and event types.
//!
//! Everything that crosses into or out of the control loop is a tagged
//! sum type consumed exactly once, never shared mutable state.

use serde::Serialize;
use uuid::Uuid;

use super::connection::{ConnectionHandle, ConnectionId};
use crate::domain::ChatMessage;

/// Membership mutations, applied one at a time by the control loop.
///
/// The loop is the only writer of the registry, so a compound command
/// (register touching many sets) is atomic with respect to every other
/// operation.
#[derive(Debug)]
pub enum MembershipCommand {
    /// Admit a connection with its full current membership snapshot.
    Register {
        connection: ConnectionHandle,
        server_ids: Vec<Uuid>,
        channel_ids: Vec<Uuid>,
    },
    /// Incremental join of channels within one server.
    JoinChannels {
        connection: ConnectionId,
        server_id: Uuid,
        channel_ids: Vec<Uuid>,
    },
    /// Leave exactly one channel set.
    QuitChannel {
        connection: ConnectionId,
        channel_id: Uuid,
    },
    /// Leave exactly one server set. Channel memberships are not
    /// implicitly removed; callers quit those individually.
    QuitServer {
        connection: ConnectionId,
        server_id: Uuid,
    },
    /// Administrative deletion: evict every member of the channel.
    RemoveChannel { channel_id: Uuid },
    /// Administrative deletion: evict every member of the server.
    RemoveServer { server_id: Uuid },
}

/// A fan-out request, consumed once by the control loop.
#[derive(Debug, Clone)]
pub enum BroadcastRequest {
    /// A persisted chat message for one channel's current listeners.
    /// A channel with no listeners makes this a silent no-op.
    Channel {
        channel_id: Uuid,
        message: ChatMessage,
    },
    /// A presence or membership event for every registered connection.
    Notification(Notification),
}

/// Non-chat events broadcast outside the channel-message path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    Connected { user_id: Uuid },
    Disconnected { user_id: Uuid },
    ChannelsJoined {
        user_id: Uuid,
        server_id: Uuid,
        channel_ids: Vec<Uuid>,
    },
    ChannelQuit { user_id: Uuid, channel_id: Uuid },
    ServerQuit { user_id: Uuid, server_id: Uuid },
    ChannelRemoved { channel_id: Uuid },
    ServerRemoved { server_id: Uuid },
}

/// Envelope queued on a connection's outbound queue and written to the
/// wire as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Message { data: ChatMessage },
    Notification { data: Notification },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outbound_message_envelope_is_tagged() {
        let message = ChatMessage::new(
            None,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "hi".into(),
            None,
        );
        let value = serde_json::to_value(Outbound::Message { data: message }).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["data"]["content"], "hi");
    }

    #[test]
    fn notification_envelope_carries_event_tag() {
        let channel_id = Uuid::new_v4();
        let value = serde_json::to_value(Outbound::Notification {
            data: Notification::ChannelRemoved { channel_id },
        })
        .unwrap();
        assert_eq!(value["type"], "notification");
        assert_eq!(value["data"]["event"], "channel_removed");
        assert_eq!(value["data"]["channel_id"], serde_json::json!(channel_id));
    }
}
