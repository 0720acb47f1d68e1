//! Event vocabulary: names and typed payloads.
//!
//! Direction conventions:
//! - relay → client: [`ConnectedData`], [`JoinedData`], [`DisconnectedData`],
//!   [`SyncContentData`], [`ChatData`]
//! - client → relay: [`JoinData`], [`SyncRequestData`], [`ChatSendData`]
//! - both directions: [`ContentChangeData`]
//!
//! `joined` and `disconnected` always carry the roster state *after* the
//! membership change that triggered them.

use serde::{Deserialize, Serialize};

use super::ConnId;

/// relay → client greeting carrying the channel-assigned identity.
pub const CONNECTED: &str = "connected";
/// client → relay request to enter a room.
pub const JOIN: &str = "join";
/// relay → room roster update after a join.
pub const JOINED: &str = "joined";
/// relay → room notice that a member left.
pub const DISCONNECTED: &str = "disconnected";
/// Targeted late-join snapshot (client → relay → one client).
pub const SYNC_CONTENT: &str = "sync_content";
/// Chat message (client → relay → room).
pub const CHAT: &str = "chat";
/// Document edit pass-through (client → relay → room minus sender).
pub const CONTENT_CHANGE: &str = "content_change";
/// client → relay explicit leave; same cleanup as an abrupt disconnect.
pub const LEAVE: &str = "leave";

/// One member of a room roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub identity: ConnId,
    pub display_name: String,
}

/// `connected` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedData {
    pub identity: ConnId,
}

/// `join` payload; the room rides in the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinData {
    pub display_name: String,
}

/// `joined` payload: the full roster after the join, plus who joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedData {
    pub members: Vec<Participant>,
    pub display_name: String,
    pub identity: ConnId,
}

/// `disconnected` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisconnectedData {
    pub identity: ConnId,
    pub display_name: String,
}

/// `sync_content` as sent by an existing member: the relay resolves
/// `target` and stamps the sender identity before forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequestData {
    pub target: ConnId,
    pub content: String,
}

/// `sync_content` as delivered to the late joiner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncContentData {
    pub content: String,
    pub identity: ConnId,
}

/// `chat` as sent by a member; the relay stamps the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSendData {
    pub text: String,
}

/// `chat` as delivered to the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatData {
    pub author: String,
    pub text: String,
}

/// `content_change` payload; opaque to the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentChangeData {
    pub content: String,
}
