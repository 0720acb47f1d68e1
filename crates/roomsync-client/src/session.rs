//! Session client: a handle plus a background transport loop.
//!
//! [`SessionClient::start`] spawns the loop and returns the handle
//! together with a bounded [`SessionEvent`] receiver. Public methods queue
//! commands over an unbounded channel and return once queued, with no
//! round-trip await. Teardown is deterministic on every exit path: the
//! loop closes the channel, marks the state `Closed`, and nothing is
//! delivered afterwards.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{Duration, Instant};

use roomsync_core::protocol::envelope::{encode, Envelope};
use roomsync_core::protocol::events;
use roomsync_core::{Result, RoomSyncError};

use crate::channel::EventChannel;
use crate::state::{Effect, Phase, SessionEvent, SessionState, ViewMode};

const DEFAULT_SYNC_WAIT: Duration = Duration::from_secs(3);
const DEFAULT_JOIN_WAIT: Duration = Duration::from_secs(10);
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for one room session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub room: String,
    pub display_name: String,
    /// How long a joiner waits for a late-join snapshot before proceeding
    /// with an empty document.
    pub sync_wait: Duration,
    /// How long to wait for our own join confirmation before giving up.
    pub join_wait: Duration,
    /// Capacity of the bounded event channel.
    pub event_capacity: usize,
}

impl SessionConfig {
    pub fn new(room: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            display_name: display_name.into(),
            sync_wait: DEFAULT_SYNC_WAIT,
            join_wait: DEFAULT_JOIN_WAIT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_sync_wait(mut self, sync_wait: Duration) -> Self {
        self.sync_wait = sync_wait;
        self
    }

    #[must_use]
    pub fn with_join_wait(mut self, join_wait: Duration) -> Self {
        self.join_wait = join_wait;
        self
    }

    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

enum Command {
    UpdateContent(String),
    SendChat(String),
    SetView(ViewMode),
    Leave,
}

/// Handle to a running session.
pub struct SessionClient {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state: Arc<Mutex<SessionState>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl SessionClient {
    /// Start the session over a connected channel. The loop waits for the
    /// relay's `connected` greeting, then joins `config.room`.
    #[must_use = "the event receiver must be consumed to observe the session"]
    pub fn start<C: EventChannel>(
        channel: C,
        config: SessionConfig,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let state = Arc::new(Mutex::new(SessionState::new()));

        let task = tokio::spawn(run_loop(
            channel,
            config,
            cmd_rx,
            event_tx,
            Arc::clone(&state),
        ));

        (
            Self {
                cmd_tx,
                state,
                task: Some(task),
            },
            event_rx,
        )
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Record a local edit and broadcast it to the room.
    pub fn update_content(&self, content: impl Into<String>) -> Result<()> {
        self.send(Command::UpdateContent(content.into()))
    }

    /// Send a chat message. Empty and whitespace-only messages are
    /// suppressed before they reach the wire.
    pub fn send_chat(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::SendChat(text.into()))
    }

    pub fn set_view(&self, view: ViewMode) -> Result<()> {
        self.send(Command::SetView(view))
    }

    /// Leave the room and wait for the loop to wind down.
    pub async fn leave(mut self) {
        let _ = self.cmd_tx.send(Command::Leave);
        if let Some(task) = self.task.take() {
            let _ = tokio::time::timeout(Duration::from_secs(1), task).await;
        }
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx.send(cmd).map_err(|_| RoomSyncError::ChannelClosed)
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        // dropping without leave() still tears the loop down
        let _ = self.cmd_tx.send(Command::Leave);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending::<()>().await,
    }
}

async fn fail(
    event_tx: &mpsc::Sender<SessionEvent>,
    state: &Arc<Mutex<SessionState>>,
    reason: &str,
) {
    tracing::warn!(%reason, "session failed");
    state.lock().await.phase = Phase::Closed;
    let _ = event_tx
        .send(SessionEvent::ConnectionFailed {
            reason: reason.to_string(),
        })
        .await;
}

async fn run_loop<C: EventChannel>(
    mut channel: C,
    cfg: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::Sender<SessionEvent>,
    state: Arc<Mutex<SessionState>>,
) {
    let mut join_deadline: Option<Instant> = Some(Instant::now() + cfg.join_wait);
    let mut sync_deadline: Option<Instant> = None;

    'session: loop {
        let deadline = match (join_deadline, sync_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        tokio::select! {
            maybe_cmd = cmd_rx.recv() => {
                match maybe_cmd {
                    None | Some(Command::Leave) => {
                        let _ = channel.send(encode(events::LEAVE, Some(&cfg.room), None)).await;
                        break 'session;
                    }
                    Some(Command::UpdateContent(content)) => {
                        state.lock().await.content = content.clone();
                        let frame = encode(
                            events::CONTENT_CHANGE,
                            Some(&cfg.room),
                            Some(json!({ "content": content })),
                        );
                        if channel.send(frame).await.is_err() {
                            fail(&event_tx, &state, "channel closed while sending an edit").await;
                            break 'session;
                        }
                    }
                    Some(Command::SendChat(text)) => {
                        if text.trim().is_empty() {
                            continue;
                        }
                        let frame = encode(events::CHAT, Some(&cfg.room), Some(json!({ "text": text })));
                        if channel.send(frame).await.is_err() {
                            fail(&event_tx, &state, "channel closed while sending chat").await;
                            break 'session;
                        }
                    }
                    Some(Command::SetView(view)) => {
                        state.lock().await.view = view;
                    }
                }
            }

            maybe_frame = channel.recv() => {
                let frame = match maybe_frame {
                    None => {
                        let phase = state.lock().await.phase;
                        if phase != Phase::Active {
                            fail(&event_tx, &state, "channel closed before the session was established").await;
                        }
                        break 'session;
                    }
                    Some(Err(err)) => {
                        fail(&event_tx, &state, &format!("channel error: {err}")).await;
                        break 'session;
                    }
                    Some(Ok(frame)) => frame,
                };

                let env = match Envelope::parse(&frame) {
                    Ok(env) => env,
                    Err(err) => {
                        tracing::debug!(error = %err, "dropping undecodable frame");
                        continue;
                    }
                };

                let effects = state.lock().await.apply(&env);
                for effect in effects {
                    match effect {
                        Effect::SendJoin => {
                            let frame = encode(
                                events::JOIN,
                                Some(&cfg.room),
                                Some(json!({ "display_name": cfg.display_name })),
                            );
                            if channel.send(frame).await.is_err() {
                                fail(&event_tx, &state, "channel closed while joining").await;
                                break 'session;
                            }
                        }
                        Effect::SendSyncTo(target) => {
                            let content = state.lock().await.content.clone();
                            let frame = encode(
                                events::SYNC_CONTENT,
                                None,
                                Some(json!({ "target": target, "content": content })),
                            );
                            if channel.send(frame).await.is_err() {
                                fail(&event_tx, &state, "channel closed while syncing a peer").await;
                                break 'session;
                            }
                        }
                        Effect::Notify(event) => {
                            match &event {
                                SessionEvent::Joined { .. } => {
                                    join_deadline = None;
                                    let synced = state.lock().await.synced;
                                    sync_deadline = if synced {
                                        None
                                    } else {
                                        Some(Instant::now() + cfg.sync_wait)
                                    };
                                }
                                SessionEvent::Synced { .. } => {
                                    sync_deadline = None;
                                }
                                _ => {}
                            }
                            if event_tx.send(event).await.is_err() {
                                // consumer is gone; the session has no audience
                                break 'session;
                            }
                        }
                    }
                }
            }

            _ = sleep_until_opt(deadline) => {
                let now = Instant::now();
                if join_deadline.is_some_and(|d| now >= d) {
                    fail(&event_tx, &state, "join confirmation timed out").await;
                    break 'session;
                }
                if sync_deadline.is_some_and(|d| now >= d) {
                    sync_deadline = None;
                    let mut st = state.lock().await;
                    if !st.synced {
                        st.synced = true;
                        drop(st);
                        if event_tx.send(SessionEvent::SyncLapsed).await.is_err() {
                            break 'session;
                        }
                    }
                }
            }
        }
    }

    let _ = channel.close().await;
    state.lock().await.phase = Phase::Closed;
    let _ = event_tx.send(SessionEvent::Closed).await;
}
