//! roomsync relay binary.
//!
//! - WebSocket endpoint: /v1/ws
//! - Decode-once pipeline: WS Message -> Inbound (event envelope)
//! - Heartbeat ping + idle timeout per session
//! - Execution proxy + ops endpoints over plain HTTP

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use roomsync_relay::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "roomsync.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .relay
        .listen
        .parse()
        .expect("relay.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("state build failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "roomsync-relay starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
