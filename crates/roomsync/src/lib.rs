//! Top-level facade crate for roomsync.
//!
//! Re-exports the protocol core, the relay library, and the client SDK so
//! users can depend on a single crate.

pub mod core {
    pub use roomsync_core::*;
}

pub mod relay {
    pub use roomsync_relay::*;
}

pub mod client {
    pub use roomsync_client::*;
}
