//! The message hub control loop.
//!
//! One perpetual task owns the registry and serializes every membership
//! mutation and every fan-out decision. All input arrives over three
//! bounded queues (membership commands, disconnects, broadcast
//! requests), handled strictly one at a time, so compound mutations are
//! atomic with respect to everything else and broadcasts observe a
//! single total order of membership changes.

use tokio::sync::mpsc;
use uuid::Uuid;

use super::connection::{ConnectionHandle, ConnectionId};
use super::events::{BroadcastRequest, MembershipCommand, Outbound};
use super::registry::Registry;

/// Capacity of each of the hub's input queues. Senders suspend briefly
/// on a full queue; they never share state with the loop.
const HUB_QUEUE_CAPACITY: usize = 64;

/// The hub task state. Constructed and consumed by [`MessageHub::start`].
pub struct MessageHub {
    registry: Registry,
    membership_rx: mpsc::Receiver<MembershipCommand>,
    disconnect_rx: mpsc::Receiver<ConnectionId>,
    broadcast_rx: mpsc::Receiver<BroadcastRequest>,
}

/// Cloneable fire-and-forget interface to the hub task.
///
/// Submissions from one caller are observed by the loop in submission
/// order per queue; completion is never awaited.
#[derive(Debug, Clone)]
pub struct HubHandle {
    membership_tx: mpsc::Sender<MembershipCommand>,
    disconnect_tx: mpsc::Sender<ConnectionId>,
    broadcast_tx: mpsc::Sender<BroadcastRequest>,
}

impl MessageHub {
    /// Spawn the control loop and return its handle. The loop runs until
    /// every handle clone has been dropped and the queues are drained.
    pub fn start() -> HubHandle {
        let (membership_tx, membership_rx) = mpsc::channel(HUB_QUEUE_CAPACITY);
        let (disconnect_tx, disconnect_rx) = mpsc::channel(HUB_QUEUE_CAPACITY);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(HUB_QUEUE_CAPACITY);

        let hub = Self {
            registry: Registry::new(),
            membership_rx,
            disconnect_rx,
            broadcast_rx,
        };
        tokio::spawn(hub.run());

        HubHandle {
            membership_tx,
            disconnect_tx,
            broadcast_tx,
        }
    }

    async fn run(mut self) {
        tracing::debug!("message hub started");

        loop {
            // Biased: membership changes and teardown win a race against
            // pending fan-out, so a broadcast always sees the newest
            // registry state that was submitted before it was handled.
            tokio::select! {
                biased;

                Some(command) = self.membership_rx.recv() => self.apply_membership(command),
                Some(connection_id) = self.disconnect_rx.recv() => self.unregister(connection_id),
                Some(request) = self.broadcast_rx.recv() => self.dispatch(request),
                else => break,
            }
        }

        tracing::debug!("message hub stopped");
    }

    fn apply_membership(&mut self, command: MembershipCommand) {
        match command {
            MembershipCommand::Register {
                connection,
                server_ids,
                channel_ids,
            } => {
                tracing::info!(
                    connection_id = %connection.id(),
                    user_id = %connection.user_id(),
                    servers = server_ids.len(),
                    channels = channel_ids.len(),
                    "connection registered"
                );
                self.registry.insert(connection, &server_ids, &channel_ids);
            }
            MembershipCommand::JoinChannels {
                connection,
                server_id,
                channel_ids,
            } => self.registry.join_channels(connection, server_id, &channel_ids),
            MembershipCommand::QuitChannel {
                connection,
                channel_id,
            } => self.registry.quit_channel(connection, channel_id),
            MembershipCommand::QuitServer {
                connection,
                server_id,
            } => self.registry.quit_server(connection, server_id),
            MembershipCommand::RemoveChannel { channel_id } => {
                self.registry.remove_channel(channel_id)
            }
            MembershipCommand::RemoveServer { server_id } => {
                self.registry.remove_server(server_id)
            }
        }
    }

    fn unregister(&mut self, connection_id: ConnectionId) {
        if let Some(connection) = self.registry.remove_connection(connection_id) {
            tracing::info!(
                connection_id = %connection_id,
                user_id = %connection.user_id(),
                "connection unregistered"
            );
            // Dropping the handle releases the hub's queue reference;
            // once the adapter's clone is gone too, the writer task
            // drains and terminates.
            drop(connection);
        }
    }

    fn dispatch(&mut self, request: BroadcastRequest) {
        match request {
            BroadcastRequest::Channel {
                channel_id,
                message,
            } => {
                for connection in self.registry.channel_members(channel_id) {
                    connection.deliver(Outbound::Message {
                        data: message.clone(),
                    });
                }
            }
            BroadcastRequest::Notification(notification) => {
                for connection in self.registry.connections() {
                    connection.deliver(Outbound::Notification {
                        data: notification.clone(),
                    });
                }
            }
        }
    }
}

impl HubHandle {
    /// Admit a connection with its current membership snapshot.
    pub async fn register(
        &self,
        connection: ConnectionHandle,
        server_ids: Vec<Uuid>,
        channel_ids: Vec<Uuid>,
    ) {
        let _ = self
            .membership_tx
            .send(MembershipCommand::Register {
                connection,
                server_ids,
                channel_ids,
            })
            .await;
    }

    /// Remove a connection from every set and release its queue.
    pub async fn unregister(&self, connection: ConnectionId) {
        let _ = self.disconnect_tx.send(connection).await;
    }

    /// Submit a broadcast for fan-out.
    pub async fn dispatch(&self, request: BroadcastRequest) {
        let _ = self.broadcast_tx.send(request).await;
    }

    pub async fn join_channels(
        &self,
        connection: ConnectionId,
        server_id: Uuid,
        channel_ids: Vec<Uuid>,
    ) {
        let _ = self
            .membership_tx
            .send(MembershipCommand::JoinChannels {
                connection,
                server_id,
                channel_ids,
            })
            .await;
    }

    pub async fn quit_channel(&self, connection: ConnectionId, channel_id: Uuid) {
        let _ = self
            .membership_tx
            .send(MembershipCommand::QuitChannel {
                connection,
                channel_id,
            })
            .await;
    }

    pub async fn quit_server(&self, connection: ConnectionId, server_id: Uuid) {
        let _ = self
            .membership_tx
            .send(MembershipCommand::QuitServer {
                connection,
                server_id,
            })
            .await;
    }

    pub async fn remove_channel(&self, channel_id: Uuid) {
        let _ = self
            .membership_tx
            .send(MembershipCommand::RemoveChannel { channel_id })
            .await;
    }

    pub async fn remove_server(&self, server_id: Uuid) {
        let _ = self
            .membership_tx
            .send(MembershipCommand::RemoveServer { server_id })
            .await;
    }
}
