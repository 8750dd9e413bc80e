//! Inbound wire frames.
//!
//! Every frame is a tagged envelope `{"type": ..., "data": ...}`. The
//! sender identity is never part of a frame; it is stamped from the
//! authenticated connection so a client cannot speak as someone else.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::MAX_CONTENT_LENGTH;

/// Frame-level errors, reported back to the sender without tearing the
/// connection down.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid frame: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// A decoded client frame.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    Message(IncomingMessage),
    JoinChannel(JoinChannelsRequest),
    QuitChannel(QuitChannelRequest),
    QuitServer(QuitServerRequest),
    RemoveChannel(RemoveChannelRequest),
    RemoveServer(RemoveServerRequest),
}

impl ClientFrame {
    /// Decode and validate one frame of wire text.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: Self = serde_json::from_str(text)?;
        if let Self::Message(message) = &frame {
            message.validate()?;
        }
        Ok(frame)
    }
}

/// A chat message submission. `server_id` is absent for direct messages.
#[derive(Debug, Deserialize, PartialEq, Validate)]
pub struct IncomingMessage {
    pub server_id: Option<Uuid>,
    pub channel_id: Uuid,
    #[validate(length(min = 1, max = MAX_CONTENT_LENGTH))]
    pub content: String,
    pub attachment: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct JoinChannelsRequest {
    pub server_id: Uuid,
    pub channels: Vec<Uuid>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct QuitChannelRequest {
    pub channel_id: Uuid,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct QuitServerRequest {
    pub server_id: Uuid,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RemoveChannelRequest {
    pub channel_id: Uuid,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RemoveServerRequest {
    pub server_id: Uuid,
}
