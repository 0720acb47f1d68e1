//! roomsync client SDK.
//!
//! A [`session::SessionClient`] drives one room session over an
//! [`channel::EventChannel`]: it joins the room, mirrors the roster and
//! transcript into a pure [`state::SessionState`], answers late joiners
//! with content snapshots, and surfaces everything the view layer needs
//! as [`state::SessionEvent`]s. The SDK never touches a UI surface.

pub mod channel;
pub mod exec;
pub mod session;
pub mod state;

pub use channel::{memory_pair, EventChannel, MemoryChannel, WsChannel};
pub use exec::ExecClient;
pub use session::{SessionClient, SessionConfig};
pub use state::{ChatLine, Effect, Phase, SessionEvent, SessionState, ViewMode};
