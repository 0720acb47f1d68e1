//! Operational HTTP endpoints.
//!
//! - `/healthz`    : liveness
//! - `/v1/metrics` : Prometheus text format

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(axum::extract::State(state): axum::extract::State<AppState>) -> Response {
    let extra = [
        ("roomsync_rooms_active", state.core().rooms.room_count() as u64),
        ("roomsync_connections", state.core().sessions.len() as u64),
    ];
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
