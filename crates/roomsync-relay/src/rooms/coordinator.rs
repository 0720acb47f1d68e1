use std::sync::Arc;

use serde_json::json;

use roomsync_core::protocol::envelope::encode;
use roomsync_core::protocol::events;
use roomsync_core::protocol::RoomKey;

use super::core::RelayCore;

/// Presence coordinator: the only writer of the room registry. Processes
/// join and disconnect events and emits the resulting roster broadcasts.
/// It never composes or inspects document content; snapshots travel
/// peer-to-peer.
pub struct PresenceCoordinator {
    core: Arc<RelayCore>,
}

impl PresenceCoordinator {
    pub fn new(core: Arc<RelayCore>) -> Self {
        Self { core }
    }

    /// Register a membership and broadcast `joined` (carrying the roster
    /// *after* the insertion) to every member of the room, the joiner
    /// included. Re-joins replace the membership record, so repeating the
    /// same join never duplicates a roster entry.
    pub async fn on_join(&self, room_key: &str, conn_id: &str, display_name: &str) {
        // A connection holds one membership at a time; a join elsewhere is
        // a leave here, and the old room must hear about it.
        if let Some(prev) = self.core.rooms.room_of(conn_id) {
            if prev != room_key {
                self.on_disconnect(conn_id).await;
            }
        }

        let roster = self.core.rooms.join(room_key, conn_id, display_name);
        tracing::info!(
            room = %room_key,
            conn = %conn_id,
            name = %display_name,
            members = roster.len(),
            "join"
        );

        let frame = encode(
            events::JOINED,
            Some(room_key),
            Some(json!({
                "members": roster,
                "display_name": display_name,
                "identity": conn_id,
            })),
        );
        self.core.publish_room(room_key, &frame).await;
    }

    /// Remove a membership and notify the remaining members. Strict no-op
    /// when the connection is in no room: no broadcast, no error.
    /// Processing the same disconnect twice is expected under churn.
    pub async fn on_disconnect(&self, conn_id: &str) -> Option<RoomKey> {
        let (room_key, member) = self.core.rooms.remove(conn_id)?;
        tracing::info!(room = %room_key, conn = %conn_id, name = %member.display_name, "disconnect");

        let frame = encode(
            events::DISCONNECTED,
            Some(&room_key),
            Some(json!({
                "identity": conn_id,
                "display_name": member.display_name,
            })),
        );
        self.core.publish_room(&room_key, &frame).await;
        Some(room_key)
    }
}
