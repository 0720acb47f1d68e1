//! Remote-execution collaborator interface (HTTP request/response).
//!
//! The runner is an opaque, possibly-slow, possibly-failing dependency.
//! Neither side retries; failures come back as `error` for the caller to
//! surface.

use serde::{Deserialize, Serialize};

/// Request body for the execution endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecRequest {
    pub language: String,
    pub script: String,
    #[serde(default)]
    pub stdin: String,
}

/// Response body: exactly one of `output` / `error` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecReply {
    pub fn output(s: impl Into<String>) -> Self {
        Self { output: Some(s.into()), error: None }
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self { output: None, error: Some(s.into()) }
    }
}
