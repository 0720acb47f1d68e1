//! Envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use roomsync_core::protocol::envelope::{encode, Envelope};
use roomsync_core::protocol::events::{ChatSendData, JoinedData};

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_envelope_min() {
    let s = load("envelope_min.json");
    let env = Envelope::parse(&s).unwrap();
    assert_eq!(env.v, 1);
    assert_eq!(env.event, "leave");
    assert!(env.room.is_none());
    assert!(env.data.is_none());
}

#[test]
fn parse_envelope_full() {
    let s = load("envelope_full.json");
    let env = Envelope::parse(&s).unwrap();
    assert_eq!(env.event, "chat");
    assert_eq!(env.room.as_deref(), Some("alpha"));
    let data: ChatSendData = env.payload().unwrap();
    assert_eq!(data.text, "hello there");
}

#[test]
fn parse_joined_roster() {
    let s = load("joined.json");
    let env = Envelope::parse(&s).unwrap();
    let data: JoinedData = env.payload().unwrap();
    assert_eq!(data.members.len(), 2);
    assert_eq!(data.identity, "conn-2");
    assert_eq!(data.members[0].display_name, "Alice");
}

#[test]
fn reject_unknown_fields() {
    let err = Envelope::parse(r#"{"v":1,"event":"chat","sneaky":true}"#).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn reject_wrong_version() {
    let err = Envelope::parse(r#"{"v":2,"event":"chat"}"#).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn missing_payload_is_bad_request() {
    let env = Envelope::parse(r#"{"v":1,"event":"chat","room":"alpha"}"#).unwrap();
    let err = env.payload::<ChatSendData>().expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn encode_roundtrips_through_parse() {
    let frame = encode("chat", Some("alpha"), Some(serde_json::json!({ "text": "hi" })));
    let env = Envelope::parse(&frame).unwrap();
    assert_eq!(env.event, "chat");
    assert_eq!(env.room.as_deref(), Some("alpha"));
    let data: ChatSendData = env.payload().unwrap();
    assert_eq!(data.text, "hi");
}

#[test]
fn encode_omits_empty_sections() {
    let frame = encode("leave", None, None);
    assert!(!frame.contains("room"));
    assert!(!frame.contains("data"));
    Envelope::parse(&frame).unwrap();
}
