//! WebSocket session transport.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS at `/v1/ws`
//! - Assign the connection identity and greet the client with it
//! - Lifecycle: ping/pong + idle timeout
//! - Decode-once, then route: presence events to the coordinator,
//!   everything else through the dispatcher
//! - Funnel every exit path (close, read error, idle timeout) through the
//!   same disconnect cleanup; the registry absorbs duplicates

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};

use roomsync_core::protocol::envelope::encode;
use roomsync_core::protocol::events::{self, JoinData};
use roomsync_core::{Result, RoomSyncError};

use crate::app_state::AppState;
use crate::rooms::{Connection, SessionCtx};
use crate::transport::codec::{decode, frame_len, Inbound};

const OUTBOUND_QUEUE: usize = 256;

pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = run_session(app, socket).await {
            tracing::debug!(error = %e, "session ended with error");
        }
    })
}

async fn run_session(app: AppState, socket: WebSocket) -> Result<()> {
    let core = app.core();
    let conn_id = core.sessions.next_conn_id();

    // ---- outbound queue, registered before anything can target us
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);
    core.sessions
        .insert(conn_id.clone(), Connection { tx: out_tx.clone() });
    app.metrics().sessions_active.inc(&[]);

    let (mut ws_tx, mut ws_rx) = socket.split();

    // ---- greeting: tell the client which identity the channel assigned
    let hello = encode(
        events::CONNECTED,
        None,
        Some(serde_json::json!({ "identity": conn_id })),
    );
    if out_tx.send(Message::Text(hello)).await.is_err() {
        core.sessions.remove(&conn_id);
        app.metrics().sessions_active.dec(&[]);
        return Err(RoomSyncError::ChannelClosed);
    }

    let relay_cfg = &app.cfg().relay;
    let ping_every = Duration::from_millis(relay_cfg.ping_interval_ms);
    let idle_timeout = Duration::from_millis(relay_cfg.idle_timeout_ms);
    let max_frame = relay_cfg.max_frame_bytes;

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_activity = Instant::now();

    let ctx = SessionCtx::new(conn_id.as_str(), core.clone());

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                if frame_len(&msg) > max_frame {
                    app.metrics().frames_oversize.inc(&[]);
                    tracing::warn!(conn = %conn_id, len = frame_len(&msg), "dropping oversize frame");
                    continue;
                }

                match decode(msg) {
                    Ok(Inbound::Event { env, .. }) => match env.event.as_str() {
                        events::JOIN => {
                            let Some(room) = env.room.clone() else {
                                tracing::debug!(conn = %conn_id, "join without room ignored");
                                continue;
                            };
                            match env.payload::<JoinData>() {
                                Ok(join) => {
                                    app.coordinator().on_join(&room, &conn_id, &join.display_name).await;
                                    app.metrics().joins_total.inc(&[]);
                                }
                                Err(err) => {
                                    tracing::debug!(conn = %conn_id, error = %err, "malformed join ignored");
                                }
                            }
                        }
                        events::LEAVE => {
                            if app.coordinator().on_disconnect(&conn_id).await.is_some() {
                                app.metrics().disconnects_total.inc(&[]);
                            }
                        }
                        _ => app.dispatcher().dispatch(ctx.clone(), env).await,
                    },
                    Ok(Inbound::Ping(payload)) => {
                        let _ = out_tx.send(Message::Pong(payload)).await;
                    }
                    Ok(Inbound::Pong(_)) => {}
                    Ok(Inbound::Close) => break,
                    Err(err) => {
                        app.metrics().decode_errors.inc(&[]);
                        tracing::debug!(conn = %conn_id, error = %err, "dropping undecodable frame");
                    }
                }
            }

            // ping
            _ = ping_tick.tick() => {
                let _ = out_tx.send(Message::Ping(Vec::new())).await;
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::debug!(conn = %conn_id, "idle timeout");
                    break;
                }
            }
        }
    }

    // Cleanup is identical for every exit path; a leave that already ran
    // makes this a no-op.
    if app.coordinator().on_disconnect(&conn_id).await.is_some() {
        app.metrics().disconnects_total.inc(&[]);
    }
    core.sessions.remove(&conn_id);
    app.metrics().sessions_active.dec(&[]);

    Ok(())
}
