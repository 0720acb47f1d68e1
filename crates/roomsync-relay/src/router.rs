//! Axum router wiring.
//!
//! `/v1/ws` carries the event channel; `/v1/execute` is the execution
//! collaborator proxy; the rest is operational.

use axum::routing::{get, post};
use axum::Router;

use crate::{app_state::AppState, ops, services, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .route("/v1/execute", post(services::exec::execute))
        .route("/healthz", get(ops::healthz))
        .route("/v1/metrics", get(ops::metrics))
        .with_state(state)
}
