//! Common Test Utilities
//!
//! In-memory ports and helpers shared by the routing tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use relay_server::domain::{ChatMessage, MembershipRepository, MessageRepository};
use relay_server::hub::Outbound;
use relay_server::shared::AppError;

/// In-memory message store. Flip `fail` to simulate a storage outage.
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
    fail: AtomicBool,
}

impl InMemoryMessageStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageStore {
    async fn create(&self, message: &ChatMessage) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage offline".into()));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Fixed membership snapshot keyed by user id.
#[derive(Default)]
pub struct StaticMemberships {
    servers: HashMap<Uuid, Vec<Uuid>>,
    channels: HashMap<Uuid, Vec<Uuid>>,
}

impl StaticMemberships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: Uuid, servers: Vec<Uuid>, channels: Vec<Uuid>) -> Self {
        self.servers.insert(user_id, servers);
        self.channels.insert(user_id, channels);
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl MembershipRepository for StaticMemberships {
    async fn user_server_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self.servers.get(&user_id).cloned().unwrap_or_default())
    }

    async fn user_channel_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self.channels.get(&user_id).cloned().unwrap_or_default())
    }
}

/// Receive the next outbound event or fail the test after one second.
pub async fn recv(rx: &mut mpsc::Receiver<Outbound>) -> Outbound {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for outbound event")
        .expect("outbound queue closed unexpectedly")
}

/// True if no further event arrives within a short grace period.
pub async fn silent(rx: &mut mpsc::Receiver<Outbound>) -> bool {
    timeout(Duration::from_millis(100), rx.recv()).await.is_err()
}
