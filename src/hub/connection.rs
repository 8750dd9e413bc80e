//! Live connection primitives.
//!
//! Each authenticated session gets a fresh [`ConnectionId`] and a bounded
//! outbound queue. The adapter owns the receiving half ([`Connection`]);
//! the hub routes through a cloneable [`ConnectionHandle`].

use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use super::events::Outbound;

/// Default capacity of a connection's outbound queue.
///
/// Small on purpose: it bounds the memory a slow consumer can pin.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 10;

/// Identity of one live session. Two concurrent sessions of the same
/// user get distinct ids, so they never evict each other's routing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The hub's non-owning view of a connection: identity plus the sending
/// half of its outbound queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: Uuid,
    outbound: mpsc::Sender<Outbound>,
}

impl ConnectionHandle {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Queue an event for delivery, without ever blocking the caller.
    ///
    /// If this one connection's queue is full the newest event is dropped
    /// for it alone; stalling the hub loop on a slow consumer would delay
    /// delivery to everyone else.
    pub fn deliver(&self, event: Outbound) {
        match self.outbound.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    connection_id = %self.id,
                    user_id = %self.user_id,
                    "outbound queue full, dropping payload"
                );
            }
            // Writer already gone; the unregister is in flight.
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

/// The adapter-owned side of a live connection.
///
/// Holds the receiving half of the outbound queue (taken once by the
/// writer task) and a sender clone used to report wire-level errors back
/// to this client. The queue closes when both the hub's handle and this
/// struct have been dropped, which is what terminates the writer task.
#[derive(Debug)]
pub struct Connection {
    handle: ConnectionHandle,
    outbound: Option<mpsc::Receiver<Outbound>>,
}

impl Connection {
    /// Create a connection with a queue of the given capacity, returning
    /// the hub-side handle and the adapter-side connection.
    pub fn open(user_id: Uuid, capacity: usize) -> (ConnectionHandle, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = ConnectionHandle {
            id: ConnectionId::new(),
            user_id,
            outbound: tx,
        };

        (
            handle.clone(),
            Self {
                handle,
                outbound: Some(rx),
            },
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    pub fn user_id(&self) -> Uuid {
        self.handle.user_id
    }

    /// Take the receiving half of the outbound queue. Returns `None` if
    /// it was already taken.
    pub fn take_outbound(&mut self) -> Option<mpsc::Receiver<Outbound>> {
        self.outbound.take()
    }

    /// Queue an event on this connection's own outbound queue, used by
    /// the inbound task to report frame errors to the client.
    pub fn notify(&self, event: Outbound) {
        self.handle.deliver(event);
    }
}
