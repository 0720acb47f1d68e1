//! Decode-once codec for the transport layer.
//!
//! - Text frames => Envelope (lazy `RawValue` for data)
//! - Ping/Pong/Close are surfaced for lifecycle management
//! - Binary frames are rejected; this protocol is single-lane JSON text

use axum::extract::ws::Message;

use roomsync_core::protocol::envelope::Envelope;
use roomsync_core::{Result, RoomSyncError};

#[derive(Debug)]
pub enum Inbound {
    Event { env: Envelope, bytes_len: usize },
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => {
            let bytes_len = s.as_bytes().len();
            let env = Envelope::parse(&s)?;
            Ok(Inbound::Event { env, bytes_len })
        }
        Message::Binary(_) => Err(RoomSyncError::BadRequest("binary frames unsupported".into())),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Frame length without decoding (cheap pre-decode policy check).
pub fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.as_bytes().len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}
