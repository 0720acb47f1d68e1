//! Session client tests: reducer rules, then full flows over an
//! in-memory channel with the test playing the relay.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use serde_json::json;

use roomsync_client::{
    memory_pair, Effect, EventChannel, Phase, SessionClient, SessionConfig, SessionEvent,
    SessionState,
};
use roomsync_core::protocol::envelope::{encode, Envelope};
use roomsync_core::protocol::events;

fn event(name: &str, room: Option<&str>, data: serde_json::Value) -> Envelope {
    Envelope::parse(&encode(name, room, Some(data))).unwrap()
}

fn joined(members: serde_json::Value, display_name: &str, identity: &str) -> Envelope {
    event(
        events::JOINED,
        Some("alpha"),
        json!({ "members": members, "display_name": display_name, "identity": identity }),
    )
}

// ── reducer ─────────────────────────────────────────────────────────

#[test]
fn connected_moves_to_joining_and_requests_join() {
    let mut state = SessionState::new();
    let effects = state.apply(&event(events::CONNECTED, None, json!({ "identity": "conn-2" })));

    assert_eq!(state.phase, Phase::Joining);
    assert_eq!(state.identity.as_deref(), Some("conn-2"));
    assert!(effects.contains(&Effect::SendJoin));
}

#[test]
fn own_joined_activates_and_records_roster() {
    let mut state = SessionState::new();
    state.apply(&event(events::CONNECTED, None, json!({ "identity": "conn-2" })));

    let members = json!([
        { "identity": "conn-1", "display_name": "Alice" },
        { "identity": "conn-2", "display_name": "Bob" },
    ]);
    let effects = state.apply(&joined(members, "Bob", "conn-2"));

    assert_eq!(state.phase, Phase::Active);
    assert_eq!(state.roster.len(), 2);
    assert!(!state.synced, "a joiner with peers still awaits a snapshot");
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(SessionEvent::Joined { .. })]
    ));
}

#[test]
fn solo_join_needs_no_snapshot() {
    let mut state = SessionState::new();
    state.apply(&event(events::CONNECTED, None, json!({ "identity": "conn-2" })));
    state.apply(&joined(
        json!([{ "identity": "conn-2", "display_name": "Bob" }]),
        "Bob",
        "conn-2",
    ));

    assert!(state.synced);
}

#[test]
fn foreign_join_triggers_a_sync_reply_when_active() {
    let mut state = SessionState::new();
    state.apply(&event(events::CONNECTED, None, json!({ "identity": "conn-2" })));
    state.apply(&joined(
        json!([{ "identity": "conn-2", "display_name": "Bob" }]),
        "Bob",
        "conn-2",
    ));

    let members = json!([
        { "identity": "conn-2", "display_name": "Bob" },
        { "identity": "conn-3", "display_name": "Carol" },
    ]);
    let effects = state.apply(&joined(members, "Carol", "conn-3"));

    assert_eq!(state.roster.len(), 2);
    assert!(effects.contains(&Effect::SendSyncTo("conn-3".into())));
}

#[test]
fn foreign_join_before_activation_sends_no_sync() {
    let mut state = SessionState::new();
    state.apply(&event(events::CONNECTED, None, json!({ "identity": "conn-2" })));

    let members = json!([
        { "identity": "conn-1", "display_name": "Alice" },
        { "identity": "conn-3", "display_name": "Carol" },
    ]);
    let effects = state.apply(&joined(members, "Carol", "conn-3"));

    assert!(!effects.iter().any(|e| matches!(e, Effect::SendSyncTo(_))));
}

#[test]
fn sync_is_last_write_wins() {
    let mut state = SessionState::new();
    state.apply(&event(
        events::SYNC_CONTENT,
        None,
        json!({ "content": "print(1)", "identity": "conn-1" }),
    ));
    state.apply(&event(
        events::SYNC_CONTENT,
        None,
        json!({ "content": "print(2)", "identity": "conn-4" }),
    ));

    assert_eq!(state.content, "print(2)");
    assert!(state.synced);
}

#[test]
fn disconnected_removes_the_peer_once() {
    let mut state = SessionState::new();
    state.apply(&event(events::CONNECTED, None, json!({ "identity": "conn-2" })));
    let members = json!([
        { "identity": "conn-1", "display_name": "Alice" },
        { "identity": "conn-2", "display_name": "Bob" },
    ]);
    state.apply(&joined(members, "Bob", "conn-2"));

    let leave = event(
        events::DISCONNECTED,
        Some("alpha"),
        json!({ "identity": "conn-1", "display_name": "Alice" }),
    );
    let effects = state.apply(&leave);
    assert_eq!(state.roster.len(), 1);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(SessionEvent::PeerLeft { .. })]
    ));

    // a duplicate notice is absorbed
    let effects = state.apply(&leave);
    assert!(effects.is_empty());
    assert_eq!(state.roster.len(), 1);
}

#[test]
fn chat_appends_in_delivery_order() {
    let mut state = SessionState::new();
    state.apply(&event(
        events::CHAT,
        Some("alpha"),
        json!({ "author": "Alice", "text": "first" }),
    ));
    state.apply(&event(
        events::CHAT,
        Some("alpha"),
        json!({ "author": "Bob", "text": "second" }),
    ));

    assert_eq!(state.transcript.len(), 2);
    assert_eq!(state.transcript[0].text, "first");
    assert_eq!(state.transcript[1].author, "Bob");
}

#[test]
fn malformed_payloads_are_dropped() {
    let mut state = SessionState::new();
    let effects = state.apply(&event(events::CONNECTED, None, json!({ "wrong": true })));
    assert!(effects.is_empty());
    assert_eq!(state.phase, Phase::Connecting);
}

// ── full flows over the in-memory channel ───────────────────────────

async fn recv_frame(relay: &mut roomsync_client::MemoryChannel) -> Envelope {
    let frame = tokio::time::timeout(Duration::from_secs(1), relay.recv())
        .await
        .expect("relay side timed out")
        .expect("channel closed")
        .unwrap();
    Envelope::parse(&frame).unwrap()
}

async fn next_event(events_rx: &mut tokio::sync::mpsc::Receiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(1), events_rx.recv())
        .await
        .expect("no event in time")
        .expect("event stream ended")
}

#[tokio::test]
async fn late_joiner_receives_roster_and_snapshot() {
    let (client_ch, mut relay) = memory_pair();
    let cfg = SessionConfig::new("alpha", "Bob").with_sync_wait(Duration::from_secs(5));
    let (client, mut events_rx) = SessionClient::start(client_ch, cfg);

    relay
        .send(encode(events::CONNECTED, None, Some(json!({ "identity": "conn-2" }))))
        .await
        .unwrap();

    let join = recv_frame(&mut relay).await;
    assert_eq!(join.event, events::JOIN);
    assert_eq!(join.room.as_deref(), Some("alpha"));

    assert_eq!(
        next_event(&mut events_rx).await,
        SessionEvent::Connected { identity: "conn-2".into() }
    );

    relay
        .send(encode(
            events::JOINED,
            Some("alpha"),
            Some(json!({
                "members": [
                    { "identity": "conn-1", "display_name": "Alice" },
                    { "identity": "conn-2", "display_name": "Bob" },
                ],
                "display_name": "Bob",
                "identity": "conn-2",
            })),
        ))
        .await
        .unwrap();

    match next_event(&mut events_rx).await {
        SessionEvent::Joined { roster } => assert_eq!(roster.len(), 2),
        other => panic!("expected Joined, got {other:?}"),
    }

    relay
        .send(encode(
            events::SYNC_CONTENT,
            None,
            Some(json!({ "content": "print(1)", "identity": "conn-1" })),
        ))
        .await
        .unwrap();

    assert_eq!(
        next_event(&mut events_rx).await,
        SessionEvent::Synced { content: "print(1)".into() }
    );
    assert_eq!(client.state().await.content, "print(1)");

    relay
        .send(encode(
            events::DISCONNECTED,
            Some("alpha"),
            Some(json!({ "identity": "conn-1", "display_name": "Alice" })),
        ))
        .await
        .unwrap();

    match next_event(&mut events_rx).await {
        SessionEvent::PeerLeft { participant, roster } => {
            assert_eq!(participant.display_name, "Alice");
            assert_eq!(roster.len(), 1);
        }
        other => panic!("expected PeerLeft, got {other:?}"),
    }

    client.leave().await;
    assert_eq!(next_event(&mut events_rx).await, SessionEvent::Closed);
    assert!(events_rx.recv().await.is_none(), "nothing after teardown");
}

#[tokio::test]
async fn established_member_syncs_a_newcomer() {
    let (client_ch, mut relay) = memory_pair();
    let cfg = SessionConfig::new("alpha", "Alice");
    let (client, mut events_rx) = SessionClient::start(client_ch, cfg);

    relay
        .send(encode(events::CONNECTED, None, Some(json!({ "identity": "conn-1" }))))
        .await
        .unwrap();
    recv_frame(&mut relay).await; // join
    relay
        .send(encode(
            events::JOINED,
            Some("alpha"),
            Some(json!({
                "members": [{ "identity": "conn-1", "display_name": "Alice" }],
                "display_name": "Alice",
                "identity": "conn-1",
            })),
        ))
        .await
        .unwrap();
    next_event(&mut events_rx).await; // Connected
    next_event(&mut events_rx).await; // Joined

    client.update_content("print(1)").unwrap();
    let edit = recv_frame(&mut relay).await;
    assert_eq!(edit.event, events::CONTENT_CHANGE);

    relay
        .send(encode(
            events::JOINED,
            Some("alpha"),
            Some(json!({
                "members": [
                    { "identity": "conn-1", "display_name": "Alice" },
                    { "identity": "conn-2", "display_name": "Bob" },
                ],
                "display_name": "Bob",
                "identity": "conn-2",
            })),
        ))
        .await
        .unwrap();

    let sync = recv_frame(&mut relay).await;
    assert_eq!(sync.event, events::SYNC_CONTENT);
    let data: serde_json::Value = serde_json::from_str(sync.data.unwrap().get()).unwrap();
    assert_eq!(data["target"], "conn-2");
    assert_eq!(data["content"], "print(1)");

    client.leave().await;
}

#[tokio::test]
async fn sync_wait_lapses_into_an_empty_document() {
    let (client_ch, mut relay) = memory_pair();
    let cfg = SessionConfig::new("alpha", "Bob").with_sync_wait(Duration::from_millis(100));
    let (client, mut events_rx) = SessionClient::start(client_ch, cfg);

    relay
        .send(encode(events::CONNECTED, None, Some(json!({ "identity": "conn-2" }))))
        .await
        .unwrap();
    recv_frame(&mut relay).await; // join
    relay
        .send(encode(
            events::JOINED,
            Some("alpha"),
            Some(json!({
                "members": [
                    { "identity": "conn-1", "display_name": "Alice" },
                    { "identity": "conn-2", "display_name": "Bob" },
                ],
                "display_name": "Bob",
                "identity": "conn-2",
            })),
        ))
        .await
        .unwrap();
    next_event(&mut events_rx).await; // Connected
    next_event(&mut events_rx).await; // Joined

    assert_eq!(next_event(&mut events_rx).await, SessionEvent::SyncLapsed);
    let state = client.state().await;
    assert!(state.synced);
    assert_eq!(state.content, "");

    client.leave().await;
}

#[tokio::test]
async fn blank_chat_never_reaches_the_wire() {
    let (client_ch, mut relay) = memory_pair();
    let cfg = SessionConfig::new("alpha", "Bob");
    let (client, mut events_rx) = SessionClient::start(client_ch, cfg);

    relay
        .send(encode(events::CONNECTED, None, Some(json!({ "identity": "conn-2" }))))
        .await
        .unwrap();
    recv_frame(&mut relay).await; // join
    relay
        .send(encode(
            events::JOINED,
            Some("alpha"),
            Some(json!({
                "members": [{ "identity": "conn-2", "display_name": "Bob" }],
                "display_name": "Bob",
                "identity": "conn-2",
            })),
        ))
        .await
        .unwrap();
    next_event(&mut events_rx).await; // Connected
    next_event(&mut events_rx).await; // Joined

    client.send_chat("   ").unwrap();
    client.send_chat("hello").unwrap();

    let frame = recv_frame(&mut relay).await;
    assert_eq!(frame.event, events::CHAT);
    let data: serde_json::Value = serde_json::from_str(frame.data.unwrap().get()).unwrap();
    assert_eq!(data["text"], "hello");

    client.leave().await;
}

#[tokio::test]
async fn join_confirmation_timeout_is_surfaced() {
    let (client_ch, mut relay) = memory_pair();
    let cfg = SessionConfig::new("alpha", "Bob").with_join_wait(Duration::from_millis(100));
    let (client, mut events_rx) = SessionClient::start(client_ch, cfg);

    relay
        .send(encode(events::CONNECTED, None, Some(json!({ "identity": "conn-2" }))))
        .await
        .unwrap();
    recv_frame(&mut relay).await; // join that no one answers

    next_event(&mut events_rx).await; // Connected
    match next_event(&mut events_rx).await {
        SessionEvent::ConnectionFailed { reason } => {
            assert!(reason.contains("join confirmation"));
        }
        other => panic!("expected ConnectionFailed, got {other:?}"),
    }
    assert_eq!(next_event(&mut events_rx).await, SessionEvent::Closed);
    assert_eq!(client.state().await.phase, Phase::Closed);
}
