//! roomsync core: transport-agnostic session-protocol contracts and error types.
//!
//! This crate defines the event envelope, the typed event payloads, and the
//! error surface shared by the relay and the client SDK. It intentionally
//! carries no transport or runtime dependencies so it can be reused in
//! multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RoomSyncError`/`Result` so neither
//! side of the channel crashes on malformed frames.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, RoomSyncError};
