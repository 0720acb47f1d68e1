use dashmap::DashMap;

use roomsync_core::protocol::events::Participant;
use roomsync_core::protocol::{ConnId, RoomKey};

/// One membership record inside a room.
#[derive(Debug, Clone)]
pub struct Member {
    pub display_name: String,
}

/// Room membership: `room_key -> members`, plus a `conn -> room` reverse
/// index. A connection belongs to at most one room; joining a second room
/// moves it. Rooms are created implicitly on first join and removed as
/// soon as their member map empties, so churn cannot leak entries.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomKey, DashMap<ConnId, Member>>,
    conn_room: DashMap<ConnId, RoomKey>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            conn_room: DashMap::new(),
        }
    }

    /// Insert (or replace) a membership and return the roster *after* the
    /// insertion. Re-joining the same room replaces the record in place;
    /// joining a different room leaves the old one first.
    pub fn join(&self, room_key: &str, conn_id: &str, display_name: &str) -> Vec<Participant> {
        let prev = self.conn_room.get(conn_id).map(|r| r.value().clone());
        if let Some(prev) = prev {
            if prev != room_key {
                self.remove(conn_id);
            }
        }

        self.conn_room
            .insert(conn_id.to_string(), room_key.to_string());
        self.rooms
            .entry(room_key.to_string())
            .or_insert_with(DashMap::new)
            .insert(
                conn_id.to_string(),
                Member {
                    display_name: display_name.to_string(),
                },
            );

        self.roster(room_key)
    }

    /// Remove a connection from whatever room holds it. Idempotent:
    /// returns `None` (and touches nothing) when the connection is in no
    /// room. Empty rooms are garbage-collected immediately.
    pub fn remove(&self, conn_id: &str) -> Option<(RoomKey, Member)> {
        let (_, room_key) = self.conn_room.remove(conn_id)?;

        let removed = match self.rooms.get(&room_key) {
            Some(members) => {
                let removed = members.remove(conn_id).map(|(_, m)| m);
                let empty = members.is_empty();
                drop(members);
                if empty {
                    self.rooms.remove_if(&room_key, |_, members| members.is_empty());
                }
                removed
            }
            None => None,
        };

        removed.map(|m| (room_key, m))
    }

    /// Current roster snapshot; empty when the room does not exist.
    pub fn roster(&self, room_key: &str) -> Vec<Participant> {
        self.rooms
            .get(room_key)
            .map(|members| {
                members
                    .iter()
                    .map(|e| Participant {
                        identity: e.key().clone(),
                        display_name: e.value().display_name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn room_of(&self, conn_id: &str) -> Option<RoomKey> {
        self.conn_room.get(conn_id).map(|r| r.value().clone())
    }

    /// Look up the membership record of a connection.
    pub fn member(&self, conn_id: &str) -> Option<Member> {
        let room_key = self.room_of(conn_id)?;
        self.rooms
            .get(&room_key)
            .and_then(|members| members.get(conn_id).map(|m| m.value().clone()))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
