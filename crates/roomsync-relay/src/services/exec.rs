//! Remote-execution proxy.
//!
//! `POST /v1/execute` forwards `{language, script, stdin}` to the
//! configured upstream runner and hands the `{output}` / `{error}` body
//! back verbatim. The runner is treated as an opaque collaborator: no
//! retries, failures become an `{error}` body for the caller to surface.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::Duration;

use roomsync_core::protocol::exec::{ExecReply, ExecRequest};
use roomsync_core::{Result, RoomSyncError};

use crate::app_state::AppState;

pub struct ExecProxy {
    http: reqwest::Client,
    upstream: String,
}

impl ExecProxy {
    pub fn new(upstream: impl Into<String>, request_timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|e| RoomSyncError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            upstream: upstream.into(),
        })
    }

    pub async fn run(&self, req: &ExecRequest) -> ExecReply {
        let resp = match self.http.post(&self.upstream).json(req).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "execution upstream unreachable");
                return ExecReply::error(format!("execution upstream unreachable: {e}"));
            }
        };

        match resp.json::<ExecReply>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "execution upstream returned malformed body");
                ExecReply::error(format!("malformed upstream response: {e}"))
            }
        }
    }
}

pub async fn execute(State(app): State<AppState>, Json(req): Json<ExecRequest>) -> Response {
    let Some(proxy) = app.exec() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ExecReply::error("execution backend not configured")),
        )
            .into_response();
    };

    app.metrics().exec_requests.inc(&[]);
    let body = proxy.run(&req).await;
    (StatusCode::OK, Json(body)).into_response()
}
