use serde::Deserialize;

use roomsync_core::{Result, RoomSyncError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub relay: RelaySection,

    #[serde(default)]
    pub exec: ExecSection,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomSyncError::UnsupportedVersion);
        }
        self.relay.validate()?;
        self.exec.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            max_frame_bytes: default_max_frame_bytes(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl RelaySection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=120000).contains(&self.ping_interval_ms) {
            return Err(RoomSyncError::BadRequest(
                "relay.ping_interval_ms must be between 1000 and 120000".into(),
            ));
        }
        if !(5000..=600000).contains(&self.idle_timeout_ms) {
            return Err(RoomSyncError::BadRequest(
                "relay.idle_timeout_ms must be between 5000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(RoomSyncError::BadRequest(
                "relay.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(1024..=1_048_576).contains(&self.max_frame_bytes) {
            return Err(RoomSyncError::BadRequest(
                "relay.max_frame_bytes must be between 1024 and 1048576".into(),
            ));
        }
        if !(100..=30000).contains(&self.send_timeout_ms) {
            return Err(RoomSyncError::BadRequest(
                "relay.send_timeout_ms must be between 100 and 30000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_max_frame_bytes() -> usize {
    65536
}
fn default_send_timeout_ms() -> u64 {
    1500
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecSection {
    /// Upstream runner endpoint. Execution is disabled when unset.
    #[serde(default)]
    pub upstream_url: Option<String>,

    #[serde(default = "default_exec_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            upstream_url: None,
            request_timeout_ms: default_exec_timeout_ms(),
        }
    }
}

impl ExecSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.upstream_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RoomSyncError::BadRequest(
                    "exec.upstream_url must be an http(s) url".into(),
                ));
            }
        }
        if !(1000..=120000).contains(&self.request_timeout_ms) {
            return Err(RoomSyncError::BadRequest(
                "exec.request_timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

fn default_exec_timeout_ms() -> u64 {
    15000
}
