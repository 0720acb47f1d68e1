//! Room state and egress.
//!
//! The registries here are the relay's only shared mutable state. They are
//! owned by [`core::RelayCore`] and mutated exclusively through the
//! [`coordinator::PresenceCoordinator`] and the per-session transport
//! tasks.

pub mod coordinator;
pub mod core;
pub mod registry;
pub mod sessions;

pub use coordinator::PresenceCoordinator;
pub use core::{RelayCore, SessionCtx};
pub use registry::{Member, RoomRegistry};
pub use sessions::{Connection, SessionRegistry};
