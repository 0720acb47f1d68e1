//! Session-protocol wire contracts.
//!
//! One lane, JSON text frames: every frame is an [`envelope::Envelope`]
//! whose `data` field stays raw until a handler parses it into one of the
//! typed payloads in [`events`]. Parsing is panic-free: malformed input is
//! reported as `RoomSyncError` instead of indexing into raw buffers.

pub mod envelope;
pub mod events;
pub mod exec;

/// Channel-assigned connection identifier; unique while the relay lives.
pub type ConnId = String;

/// Room identifier (client-chosen, opaque to the relay).
pub type RoomKey = String;
