//! Shared application state for the roomsync relay.
//!
//! Wires the registries, presence coordinator, dispatcher, built-in room
//! services, and the optional execution proxy. Startup errors are
//! explicit (`Result` instead of panic).

use std::sync::Arc;

use roomsync_core::Result;

use crate::config::RelayConfig;
use crate::dispatch::Dispatcher;
use crate::obs::RelayMetrics;
use crate::rooms::{PresenceCoordinator, RelayCore};
use crate::services::{ChatService, ContentChangeService, ExecProxy, SyncContentService};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: RelayConfig,
    core: Arc<RelayCore>,
    coordinator: PresenceCoordinator,
    dispatcher: Dispatcher,
    exec: Option<ExecProxy>,
    metrics: RelayMetrics,
}

impl AppState {
    pub fn new(cfg: RelayConfig) -> Result<Self> {
        let core = Arc::new(RelayCore::new(cfg.relay.send_timeout_ms));
        let coordinator = PresenceCoordinator::new(Arc::clone(&core));

        let dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(ChatService::new()));
        dispatcher.register(Arc::new(ContentChangeService::new()));
        dispatcher.register(Arc::new(SyncContentService::new()));

        let exec = match &cfg.exec.upstream_url {
            Some(url) => Some(ExecProxy::new(url.clone(), cfg.exec.request_timeout_ms)?),
            None => None,
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                core,
                coordinator,
                dispatcher,
                exec,
                metrics: RelayMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn core(&self) -> Arc<RelayCore> {
        Arc::clone(&self.inner.core)
    }

    pub fn coordinator(&self) -> &PresenceCoordinator {
        &self.inner.coordinator
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn exec(&self) -> Option<&ExecProxy> {
        self.inner.exec.as_ref()
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.inner.metrics
    }
}
