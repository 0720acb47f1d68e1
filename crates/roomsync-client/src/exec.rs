//! Client for the remote-execution collaborator.
//!
//! One request, one response, no retries. Failures come back as errors
//! for the caller to surface; the room session is unaffected either way.

use tokio::time::Duration;

use roomsync_core::protocol::exec::{ExecReply, ExecRequest};
use roomsync_core::{Result, RoomSyncError};

pub struct ExecClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ExecClient {
    /// `endpoint` is the relay's execute route, e.g.
    /// `http://relay:8080/v1/execute`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RoomSyncError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub async fn run(&self, req: &ExecRequest) -> Result<ExecReply> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(req)
            .send()
            .await
            .map_err(|e| RoomSyncError::Exec(e.to_string()))?;
        resp.json::<ExecReply>()
            .await
            .map_err(|e| RoomSyncError::Exec(format!("malformed response: {e}")))
    }
}
