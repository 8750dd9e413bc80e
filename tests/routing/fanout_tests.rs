//! Fan-out and lifecycle scenarios through the full service stack:
//! real hub task, in-memory ports.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use relay_server::application::ChatService;
use relay_server::hub::{Connection, MessageHub, Notification, Outbound};

use crate::common::{recv, silent, InMemoryMessageStore, StaticMemberships};

struct Scenario {
    chat: ChatService,
    store: Arc<InMemoryMessageStore>,
}

impl Scenario {
    fn new(memberships: Arc<StaticMemberships>) -> Self {
        let store = InMemoryMessageStore::new();
        let chat = ChatService::new(MessageHub::start(), store.clone(), memberships, 10);
        Self { chat, store }
    }

    /// Connect a user and drain the Connected announcement from their
    /// own queue.
    async fn connect(&self, user_id: Uuid) -> (Connection, mpsc::Receiver<Outbound>) {
        let mut connection = self.chat.connect(user_id).await.expect("connect failed");
        let mut rx = connection.take_outbound().expect("outbound already taken");
        assert_eq!(
            recv(&mut rx).await,
            Outbound::Notification {
                data: Notification::Connected { user_id }
            }
        );
        (connection, rx)
    }
}

fn expect_message(event: Outbound, channel_id: Uuid, content: &str) {
    match event {
        Outbound::Message { data } => {
            assert_eq!(data.channel_id(), channel_id);
            assert_eq!(data.record().content, content);
        }
        other => panic!("expected chat message, got {other:?}"),
    }
}

#[tokio::test]
async fn channel_fanout_follows_membership() {
    let server = Uuid::new_v4();
    let general = Uuid::new_v4();
    let side = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let scenario = Scenario::new(
        StaticMemberships::new()
            .with_user(alice, vec![server], vec![general, side])
            .with_user(bob, vec![server], vec![general])
            .build(),
    );

    let (_alice_conn, mut alice_rx) = scenario.connect(alice).await;
    let (bob_conn, mut bob_rx) = scenario.connect(bob).await;
    // Alice also sees Bob's presence announcement.
    assert_eq!(
        recv(&mut alice_rx).await,
        Outbound::Notification {
            data: Notification::Connected { user_id: bob }
        }
    );

    // A message in the shared channel reaches both members.
    scenario
        .chat
        .send_message(alice, Some(server), general, "hi all".into(), None)
        .await
        .unwrap();
    expect_message(recv(&mut alice_rx).await, general, "hi all");
    expect_message(recv(&mut bob_rx).await, general, "hi all");

    // A message in the side channel reaches only its member.
    scenario
        .chat
        .send_message(alice, Some(server), side, "just us".into(), None)
        .await
        .unwrap();
    expect_message(recv(&mut alice_rx).await, side, "just us");
    assert!(silent(&mut bob_rx).await);

    // After Bob disconnects, the shared channel only has one listener.
    scenario.chat.disconnect(&bob_conn).await;
    assert_eq!(
        recv(&mut alice_rx).await,
        Outbound::Notification {
            data: Notification::Disconnected { user_id: bob }
        }
    );

    scenario
        .chat
        .send_message(alice, Some(server), general, "still here".into(), None)
        .await
        .unwrap();
    expect_message(recv(&mut alice_rx).await, general, "still here");

    assert_eq!(scenario.store.stored().len(), 3);
}

#[tokio::test]
async fn notifications_arrive_once_per_connection() {
    let server_a = Uuid::new_v4();
    let server_b = Uuid::new_v4();
    let alice = Uuid::new_v4();

    // Alice belongs to two servers; global announcements must still
    // reach her exactly once.
    let scenario = Scenario::new(
        StaticMemberships::new()
            .with_user(alice, vec![server_a, server_b], vec![])
            .build(),
    );

    let (_conn, mut rx) = scenario.connect(alice).await;

    let channel = Uuid::new_v4();
    scenario.chat.remove_channel(channel).await;

    assert_eq!(
        recv(&mut rx).await,
        Outbound::Notification {
            data: Notification::ChannelRemoved { channel_id: channel }
        }
    );
    assert!(silent(&mut rx).await);
}

#[tokio::test]
async fn persistence_failure_broadcasts_nothing() {
    let channel = Uuid::new_v4();
    let alice = Uuid::new_v4();

    let scenario = Scenario::new(
        StaticMemberships::new()
            .with_user(alice, vec![], vec![channel])
            .build(),
    );
    let (_conn, mut rx) = scenario.connect(alice).await;

    scenario.store.set_failing(true);
    let result = scenario
        .chat
        .send_message(alice, None, channel, "lost".into(), None)
        .await;

    assert!(result.is_err());
    assert!(silent(&mut rx).await);
    assert!(scenario.store.stored().is_empty());
}

#[tokio::test]
async fn removing_a_server_keeps_channel_routing() {
    let server = Uuid::new_v4();
    let channel = Uuid::new_v4();
    let alice = Uuid::new_v4();

    let scenario = Scenario::new(
        StaticMemberships::new()
            .with_user(alice, vec![server], vec![channel])
            .build(),
    );
    let (_conn, mut rx) = scenario.connect(alice).await;

    scenario.chat.remove_server(server).await;
    assert_eq!(
        recv(&mut rx).await,
        Outbound::Notification {
            data: Notification::ServerRemoved { server_id: server }
        }
    );

    // Channel membership is independent of the server set.
    scenario
        .chat
        .send_message(alice, None, channel, "still routed".into(), None)
        .await
        .unwrap();
    expect_message(recv(&mut rx).await, channel, "still routed");
}

#[tokio::test]
async fn joined_channels_start_receiving() {
    let server = Uuid::new_v4();
    let channel = Uuid::new_v4();
    let alice = Uuid::new_v4();

    let scenario = Scenario::new(
        StaticMemberships::new()
            .with_user(alice, vec![server], vec![])
            .build(),
    );
    let (conn, mut rx) = scenario.connect(alice).await;

    // Before joining, channel traffic passes Alice by.
    scenario
        .chat
        .send_message(alice, Some(server), channel, "early".into(), None)
        .await
        .unwrap();
    assert!(silent(&mut rx).await);

    scenario.chat.join_channels(&conn, server, vec![channel]).await;
    assert_eq!(
        recv(&mut rx).await,
        Outbound::Notification {
            data: Notification::ChannelsJoined {
                user_id: alice,
                server_id: server,
                channel_ids: vec![channel],
            }
        }
    );

    scenario
        .chat
        .send_message(alice, Some(server), channel, "now routed".into(), None)
        .await
        .unwrap();
    expect_message(recv(&mut rx).await, channel, "now routed");
}

#[tokio::test]
async fn disconnect_before_writer_starts_still_tears_down() {
    let channel = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let scenario = Scenario::new(
        StaticMemberships::new()
            .with_user(alice, vec![], vec![channel])
            .with_user(bob, vec![], vec![channel])
            .build(),
    );

    // Registered, but the outbound receiver is never handed to a writer.
    let mut conn = scenario.chat.connect(alice).await.unwrap();
    scenario.chat.disconnect(&conn).await;

    // Routing continues for the remaining member.
    let (_bob_conn, mut bob_rx) = scenario.connect(bob).await;
    scenario
        .chat
        .send_message(bob, None, channel, "carry on".into(), None)
        .await
        .unwrap();
    expect_message(recv(&mut bob_rx).await, channel, "carry on");

    // Alice's queue holds only what was buffered before the eviction,
    // then closes once her side releases the queue too.
    let mut rx = conn.take_outbound().unwrap();
    assert_eq!(
        recv(&mut rx).await,
        Outbound::Notification {
            data: Notification::Connected { user_id: alice }
        }
    );
    drop(conn);
    let closed = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("queue did not close");
    assert!(closed.is_none());
}

#[tokio::test]
async fn disconnect_closes_the_outbound_queue() {
    let alice = Uuid::new_v4();
    let scenario = Scenario::new(StaticMemberships::new().with_user(alice, vec![], vec![]).build());
    let (conn, mut rx) = scenario.connect(alice).await;

    // The eviction happens before the departure broadcast, so the
    // leaving connection never sees its own Disconnected event.
    scenario.chat.disconnect(&conn).await;

    // Once the adapter side drops too, the queue terminates.
    drop(conn);
    let closed = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("queue did not close");
    assert!(closed.is_none());
}
