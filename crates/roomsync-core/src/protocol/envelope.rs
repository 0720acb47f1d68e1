//! Event envelope (JSON text frame).
//!
//! The envelope stores `data` as `RawValue` to enable lazy parsing by
//! whichever handler knows the event's payload shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{Result, RoomSyncError};

/// Wire protocol version carried in every frame.
pub const PROTOCOL_VERSION: u8 = 1;

/// One named event on the channel.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Protocol version.
    pub v: u8,
    /// Event name (see [`super::events`]).
    pub event: String,
    /// Optional room scope.
    #[serde(default)]
    pub room: Option<String>,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Parse a text frame into an envelope, enforcing the protocol version.
    pub fn parse(s: &str) -> Result<Self> {
        let env: Envelope = serde_json::from_str(s)
            .map_err(|e| RoomSyncError::BadRequest(format!("invalid envelope json: {e}")))?;
        if env.v != PROTOCOL_VERSION {
            return Err(RoomSyncError::UnsupportedVersion);
        }
        Ok(env)
    }

    /// Parse the raw `data` payload into a typed event struct.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self
            .data
            .as_ref()
            .ok_or_else(|| RoomSyncError::BadRequest(format!("{} requires data", self.event)))?;
        serde_json::from_str(raw.get())
            .map_err(|e| RoomSyncError::BadRequest(format!("{} invalid data: {e}", self.event)))
    }
}

/// Encode an event frame. Serialization of `json!`-built values cannot fail.
pub fn encode(event: &str, room: Option<&str>, data: Option<serde_json::Value>) -> String {
    let mut frame = serde_json::json!({
        "v": PROTOCOL_VERSION,
        "event": event,
    });
    if let Some(room) = room {
        frame["room"] = serde_json::Value::String(room.to_string());
    }
    if let Some(data) = data {
        frame["data"] = data;
    }
    frame.to_string()
}
