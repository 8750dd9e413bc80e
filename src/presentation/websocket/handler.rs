//! WebSocket Connection Adapter
//!
//! Bridges one physical duplex connection to the hub: a writer task
//! draining the connection's outbound queue, and an inbound loop turning
//! wire frames into service calls.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use super::frames::ClientFrame;
use crate::hub::{Connection, Outbound};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Query parameters for the gateway upgrade request.
#[derive(Debug, Deserialize)]
pub struct GatewayParams {
    token: String,
}

/// WebSocket upgrade handler.
///
/// The token is validated before the upgrade; an invalid token refuses
/// the connection with 401 and the wire is never upgraded.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<GatewayParams>,
    State(state): State<AppState>,
) -> Response {
    let user_id = match state.auth.validate_token(&params.token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(error = %e, "gateway upgrade refused");
            return AppError::Unauthorized(e.to_string()).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Run one connection until the transport fails or the client leaves.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: uuid::Uuid) {
    let mut connection = match state.chat.connect(user_id).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "connection refused");
            return;
        }
    };
    let Some(mut outbound) = connection.take_outbound() else {
        // Already registered with the hub, so tear down properly.
        state.chat.disconnect(&connection).await;
        return;
    };

    let connection_id = connection.id();
    tracing::info!(connection_id = %connection_id, user_id = %user_id, "client connected");

    let (mut sender, mut receiver) = socket.split();

    // Writer task: drains the outbound queue to the wire. Terminates
    // when the queue closes (hub unregister plus adapter drop) or on a
    // write failure.
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize outbound event");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound loop: one frame at a time. Decode failures are reported to
    // the sender and the loop continues; transport failures end it.
    loop {
        match receiver.next().await {
            Some(Ok(Message::Text(text))) => match ClientFrame::parse(&text) {
                Ok(frame) => handle_frame(frame, &connection, &state).await,
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "bad frame");
                    connection.notify(Outbound::Error {
                        message: e.to_string(),
                    });
                }
            },
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => {
                // Ping/pong handled by axum; binary frames are ignored.
            }
            Some(Err(e)) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "transport error");
                break;
            }
        }
    }

    // Single teardown path regardless of which side failed first: the
    // writer exits once the hub's queue reference and ours are gone.
    state.chat.disconnect(&connection).await;
    drop(connection);
    let _ = writer.await;

    tracing::info!(connection_id = %connection_id, user_id = %user_id, "client disconnected");
}

/// Route one decoded frame. The sender identity always comes from the
/// authenticated connection.
async fn handle_frame(frame: ClientFrame, connection: &Connection, state: &AppState) {
    match frame {
        ClientFrame::Message(message) => {
            if let Err(e) = state
                .chat
                .send_message(
                    connection.user_id(),
                    message.server_id,
                    message.channel_id,
                    message.content,
                    message.attachment,
                )
                .await
            {
                connection.notify(Outbound::Error {
                    message: e.to_string(),
                });
            }
        }
        ClientFrame::JoinChannel(request) => {
            state
                .chat
                .join_channels(connection, request.server_id, request.channels)
                .await;
        }
        ClientFrame::QuitChannel(request) => {
            state.chat.quit_channel(connection, request.channel_id).await;
        }
        ClientFrame::QuitServer(request) => {
            state.chat.quit_server(connection, request.server_id).await;
        }
        ClientFrame::RemoveChannel(request) => {
            state.chat.remove_channel(request.channel_id).await;
        }
        ClientFrame::RemoveServer(request) => {
            state.chat.remove_server(request.server_id).await;
        }
    }
}
