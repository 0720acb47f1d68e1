//! Shared error type across roomsync crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed frame.
    BadRequest,
    /// Unsupported protocol version.
    UnsupportedVersion,
    /// Channel handshake failed.
    ConnectFailed,
    /// Channel closed underneath us.
    ChannelClosed,
    /// A bounded wait expired.
    Timeout,
    /// Remote execution collaborator failed.
    ExecFailed,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::ConnectFailed => "CONNECT_FAILED",
            ClientCode::ChannelClosed => "CHANNEL_CLOSED",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::ExecFailed => "EXEC_FAILED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoomSyncError>;

/// Unified error type used by the relay and the client SDK.
#[derive(Debug, Error)]
pub enum RoomSyncError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("channel closed")]
    ChannelClosed,
    #[error("timed out")]
    Timeout,
    #[error("execution failed: {0}")]
    Exec(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RoomSyncError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RoomSyncError::BadRequest(_) => ClientCode::BadRequest,
            RoomSyncError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            RoomSyncError::Connect(_) => ClientCode::ConnectFailed,
            RoomSyncError::ChannelClosed => ClientCode::ChannelClosed,
            RoomSyncError::Timeout => ClientCode::Timeout,
            RoomSyncError::Exec(_) => ClientCode::ExecFailed,
            RoomSyncError::Internal(_) => ClientCode::Internal,
        }
    }
}
