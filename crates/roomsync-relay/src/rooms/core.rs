use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::time::{timeout, Duration};

use super::registry::RoomRegistry;
use super::sessions::SessionRegistry;

/// RelayCore: the two registries plus egress (send to one connection /
/// publish to a room). Frames arrive here already encoded; the relay
/// serializes once and clones per receiver.
pub struct RelayCore {
    pub sessions: Arc<SessionRegistry>,
    pub rooms: Arc<RoomRegistry>,
    send_timeout: Duration,
}

impl RelayCore {
    pub fn new(send_timeout_ms: u64) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            rooms: Arc::new(RoomRegistry::new()),
            send_timeout: Duration::from_millis(send_timeout_ms),
        }
    }

    /// Targeted delivery. Returns false when the connection is unknown;
    /// the caller decides whether that is worth a log line. It is never an
    /// error (routing to a gone peer is a tolerated protocol violation).
    pub async fn send_to(&self, conn_id: &str, frame: &str) -> bool {
        let Some(conn) = self.sessions.get(conn_id) else {
            return false;
        };
        let msg = Message::Text(frame.to_string());
        if conn.tx.try_send(msg).is_ok() {
            return true;
        }
        let msg = Message::Text(frame.to_string());
        timeout(self.send_timeout, conn.tx.send(msg)).await.is_ok()
    }

    /// Fan a frame out to every current member of a room. Sends run
    /// concurrently; a slow receiver is bounded by the send timeout and
    /// never stalls the rest of the room.
    pub async fn publish_room(&self, room_key: &str, frame: &str) {
        self.publish_room_filtered(room_key, frame, None).await;
    }

    /// Same fan-out, excluding one connection (echo suppression for
    /// content broadcasts).
    pub async fn publish_room_except(&self, room_key: &str, skip: &str, frame: &str) {
        self.publish_room_filtered(room_key, frame, Some(skip)).await;
    }

    async fn publish_room_filtered(&self, room_key: &str, frame: &str, skip: Option<&str>) {
        let members = self.rooms.roster(room_key);
        let mut futs = FuturesUnordered::new();

        for member in members {
            if skip == Some(member.identity.as_str()) {
                continue;
            }
            if let Some(conn) = self.sessions.get(&member.identity) {
                let msg = Message::Text(frame.to_string());
                let send_timeout = self.send_timeout;
                futs.push(async move {
                    if conn.tx.try_send(msg).is_ok() {
                        return;
                    }
                    let msg = Message::Text(frame.to_string());
                    if timeout(send_timeout, conn.tx.send(msg)).await.is_err() {
                        tracing::warn!(conn = %member.identity, "room publish timed out");
                    }
                });
            }
        }

        while futs.next().await.is_some() {}
    }
}

/// Per-message context handed to room services (borrow the relay's tools
/// instead of owning them).
#[derive(Clone)]
pub struct SessionCtx {
    conn_id: Arc<str>,
    core: Arc<RelayCore>,
}

impl SessionCtx {
    pub fn new(conn_id: impl Into<Arc<str>>, core: Arc<RelayCore>) -> Self {
        Self {
            conn_id: conn_id.into(),
            core,
        }
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn core(&self) -> &RelayCore {
        &self.core
    }

    pub async fn send_to(&self, conn_id: &str, frame: &str) -> bool {
        self.core.send_to(conn_id, frame).await
    }

    pub async fn publish_room(&self, room_key: &str, frame: &str) {
        self.core.publish_room(room_key, frame).await
    }

    pub async fn publish_room_except(&self, room_key: &str, skip: &str, frame: &str) {
        self.core.publish_room_except(room_key, skip, frame).await
    }
}
