//! Built-in room services.

pub mod chat;
pub mod content;
pub mod exec;

pub use chat::ChatService;
pub use content::{ContentChangeService, SyncContentService};
pub use exec::ExecProxy;
