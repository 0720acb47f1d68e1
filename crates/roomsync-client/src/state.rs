//! Pure session state and the event reducer.
//!
//! [`SessionState`] is the client's whole world: phase, identity, roster,
//! transcript, content, and view mode. The view layer renders it; nothing
//! here assumes a UI surface. [`SessionState::apply`] is sans-IO: it
//! mutates the state and hands back [`Effect`]s for the transport loop to
//! execute, which keeps every protocol rule unit-testable.

use roomsync_core::protocol::envelope::Envelope;
use roomsync_core::protocol::events::{
    self, ChatData, ConnectedData, ContentChangeData, DisconnectedData, JoinedData, Participant,
    SyncContentData,
};
use roomsync_core::protocol::ConnId;

/// Session lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Joining,
    Active,
    Closed,
}

/// Which pane of the IO area the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Input,
    Output,
}

/// One transcript line, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub author: String,
    pub text: String,
}

/// Everything a session knows, as plain data.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    /// Channel-assigned identity, known once `connected` arrives.
    pub identity: Option<ConnId>,
    pub roster: Vec<Participant>,
    pub transcript: Vec<ChatLine>,
    /// Local copy of the shared document.
    pub content: String,
    /// Whether the late-join snapshot has been settled (received, trivially
    /// empty, or lapsed).
    pub synced: bool,
    pub view: ViewMode,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Connecting,
            identity: None,
            roster: Vec::new(),
            transcript: Vec::new(),
            content: String::new(),
            synced: false,
            view: ViewMode::default(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the transport loop must do after a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit the join request (we now know our identity).
    SendJoin,
    /// Answer a late joiner with our content snapshot.
    SendSyncTo(ConnId),
    /// Surface an event to the consumer.
    Notify(SessionEvent),
}

/// Events surfaced to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Connected { identity: ConnId },
    /// Our own join was confirmed; we are a room member now.
    Joined { roster: Vec<Participant> },
    PeerJoined { participant: Participant, roster: Vec<Participant> },
    PeerLeft { participant: Participant, roster: Vec<Participant> },
    Chat { author: String, text: String },
    ContentChanged { content: String },
    /// A late-join snapshot arrived (last write wins).
    Synced { content: String },
    /// No member answered within the sync window; proceeding empty.
    SyncLapsed,
    /// Fatal session failure, never silent; the view layer must react.
    ConnectionFailed { reason: String },
    Closed,
}

impl SessionState {
    /// Apply one server event. Unknown events and malformed payloads are
    /// dropped, mirroring the relay's tolerance.
    pub fn apply(&mut self, env: &Envelope) -> Vec<Effect> {
        match env.event.as_str() {
            events::CONNECTED => self.on_connected(env),
            events::JOINED => self.on_joined(env),
            events::DISCONNECTED => self.on_disconnected(env),
            events::SYNC_CONTENT => self.on_sync(env),
            events::CONTENT_CHANGE => self.on_content_change(env),
            events::CHAT => self.on_chat(env),
            other => {
                tracing::debug!(event = %other, "ignoring unknown event");
                Vec::new()
            }
        }
    }

    fn on_connected(&mut self, env: &Envelope) -> Vec<Effect> {
        let Ok(data) = env.payload::<ConnectedData>() else {
            return Vec::new();
        };
        self.identity = Some(data.identity.clone());
        if self.phase != Phase::Connecting {
            return Vec::new();
        }
        self.phase = Phase::Joining;
        vec![
            Effect::Notify(SessionEvent::Connected { identity: data.identity }),
            Effect::SendJoin,
        ]
    }

    fn on_joined(&mut self, env: &Envelope) -> Vec<Effect> {
        let Ok(data) = env.payload::<JoinedData>() else {
            return Vec::new();
        };
        self.roster = data.members.clone();

        if self.identity.as_deref() == Some(data.identity.as_str()) {
            if self.phase != Phase::Joining {
                return Vec::new();
            }
            self.phase = Phase::Active;
            // alone in the room: there is no one to sync from
            if self.roster.len() <= 1 {
                self.synced = true;
            }
            return vec![Effect::Notify(SessionEvent::Joined { roster: self.roster.clone() })];
        }

        let participant = Participant {
            identity: data.identity.clone(),
            display_name: data.display_name.clone(),
        };
        let mut effects = vec![Effect::Notify(SessionEvent::PeerJoined {
            participant,
            roster: self.roster.clone(),
        })];
        // every established member answers a late joiner; the receiver
        // applies the last snapshot it gets
        if self.phase == Phase::Active {
            effects.push(Effect::SendSyncTo(data.identity));
        }
        effects
    }

    fn on_disconnected(&mut self, env: &Envelope) -> Vec<Effect> {
        let Ok(data) = env.payload::<DisconnectedData>() else {
            return Vec::new();
        };
        let before = self.roster.len();
        self.roster.retain(|p| p.identity != data.identity);
        if self.roster.len() == before {
            // already gone; duplicate notices are absorbed
            return Vec::new();
        }
        vec![Effect::Notify(SessionEvent::PeerLeft {
            participant: Participant {
                identity: data.identity,
                display_name: data.display_name,
            },
            roster: self.roster.clone(),
        })]
    }

    fn on_sync(&mut self, env: &Envelope) -> Vec<Effect> {
        let Ok(data) = env.payload::<SyncContentData>() else {
            return Vec::new();
        };
        self.content = data.content.clone();
        self.synced = true;
        vec![Effect::Notify(SessionEvent::Synced { content: data.content })]
    }

    fn on_content_change(&mut self, env: &Envelope) -> Vec<Effect> {
        let Ok(data) = env.payload::<ContentChangeData>() else {
            return Vec::new();
        };
        self.content = data.content.clone();
        vec![Effect::Notify(SessionEvent::ContentChanged { content: data.content })]
    }

    fn on_chat(&mut self, env: &Envelope) -> Vec<Effect> {
        let Ok(data) = env.payload::<ChatData>() else {
            return Vec::new();
        };
        self.transcript.push(ChatLine {
            author: data.author.clone(),
            text: data.text.clone(),
        });
        vec![Effect::Notify(SessionEvent::Chat {
            author: data.author,
            text: data.text,
        })]
    }
}
