//! Membership registry.
//!
//! A connection table indexed by two independent key spaces (server id,
//! channel id). The index sets hold connection ids only; the table holds
//! the single routing handle per connection, which keeps teardown to one
//! removal plus index scrubbing.
//!
//! The registry is owned by the hub control loop and mutated nowhere
//! else, so it needs no interior locking.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::connection::{ConnectionHandle, ConnectionId};

#[derive(Debug, Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, ConnectionHandle>,
    servers: HashMap<Uuid, HashSet<ConnectionId>>,
    channels: HashMap<Uuid, HashSet<ConnectionId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a connection and seed its membership snapshot.
    pub fn insert(
        &mut self,
        connection: ConnectionHandle,
        server_ids: &[Uuid],
        channel_ids: &[Uuid],
    ) {
        let id = connection.id();
        self.connections.insert(id, connection);

        for server_id in server_ids {
            self.servers.entry(*server_id).or_default().insert(id);
        }
        for channel_id in channel_ids {
            self.channels.entry(*channel_id).or_default().insert(id);
        }
    }

    /// Incremental join: the server set plus each listed channel set.
    pub fn join_channels(
        &mut self,
        connection: ConnectionId,
        server_id: Uuid,
        channel_ids: &[Uuid],
    ) {
        if !self.connections.contains_key(&connection) {
            return;
        }

        self.servers.entry(server_id).or_default().insert(connection);
        for channel_id in channel_ids {
            self.channels.entry(*channel_id).or_default().insert(connection);
        }
    }

    pub fn quit_channel(&mut self, connection: ConnectionId, channel_id: Uuid) {
        if let Some(members) = self.channels.get_mut(&channel_id) {
            members.remove(&connection);
        }
    }

    /// Removes the connection from the server set only; channel
    /// memberships survive and are quit individually.
    pub fn quit_server(&mut self, connection: ConnectionId, server_id: Uuid) {
        if let Some(members) = self.servers.get_mut(&server_id) {
            members.remove(&connection);
        }
    }

    pub fn remove_channel(&mut self, channel_id: Uuid) {
        self.channels.remove(&channel_id);
    }

    pub fn remove_server(&mut self, server_id: Uuid) {
        self.servers.remove(&server_id);
    }

    /// Drop a connection from the table and every index set, returning
    /// its handle so the caller controls when the queue reference dies.
    ///
    /// O(total sets), which is fine: disconnects are far rarer than
    /// messages and this avoids maintaining reverse indices.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Option<ConnectionHandle> {
        for members in self.servers.values_mut() {
            members.remove(&connection);
        }
        for members in self.channels.values_mut() {
            members.remove(&connection);
        }
        self.connections.remove(&connection)
    }

    /// Current listeners of one channel. Empty (not an error) when the
    /// channel has no set.
    pub fn channel_members(&self, channel_id: Uuid) -> impl Iterator<Item = &ConnectionHandle> {
        self.channels
            .get(&channel_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.connections.get(id))
    }

    /// Every registered connection, each exactly once. Walking the table
    /// rather than the server sets makes exactly-once delivery structural
    /// for connections that belong to several servers.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionHandle> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[cfg(test)]
    fn is_server_member(&self, server_id: Uuid, connection: ConnectionId) -> bool {
        self.servers
            .get(&server_id)
            .is_some_and(|members| members.contains(&connection))
    }

    #[cfg(test)]
    fn is_channel_member(&self, channel_id: Uuid, connection: ConnectionId) -> bool {
        self.channels
            .get(&channel_id)
            .is_some_and(|members| members.contains(&connection))
    }
}
