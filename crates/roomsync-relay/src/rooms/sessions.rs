use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

use roomsync_core::protocol::ConnId;

/// One connection's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

/// Connection registry: `conn_id -> Connection`. Identifiers come from an
/// atomic counter and are never reused while the process lives.
#[derive(Default)]
pub struct SessionRegistry {
    conns: DashMap<ConnId, Connection>,
    seq: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn next_conn_id(&self) -> ConnId {
        format!("conn-{}", self.seq.fetch_add(1, Ordering::Relaxed))
    }

    pub fn insert(&self, conn_id: ConnId, conn: Connection) {
        self.conns.insert(conn_id, conn);
    }

    pub fn remove(&self, conn_id: &str) -> Option<Connection> {
        self.conns.remove(conn_id).map(|(_, conn)| conn)
    }

    pub fn get(&self, conn_id: &str) -> Option<Connection> {
        self.conns.get(conn_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }
}
