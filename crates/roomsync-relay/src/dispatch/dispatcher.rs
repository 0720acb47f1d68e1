use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use roomsync_core::protocol::envelope::Envelope;
use roomsync_core::Result;

use crate::rooms::SessionCtx;

/// A room-scoped event handler, registered under one event name.
#[async_trait]
pub trait RoomService: Send + Sync {
    fn event(&self) -> &'static str;
    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()>;
}

/// Registry and dispatcher for room services.
///
/// Unknown events and service-level failures are dropped, not surfaced to
/// the sender: the relay routes, it does not validate.
#[derive(Default)]
pub struct Dispatcher {
    services: DashMap<&'static str, Arc<dyn RoomService>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    pub fn register(&self, svc: Arc<dyn RoomService>) {
        self.services.insert(svc.event(), svc);
    }

    pub fn registered_events(&self) -> Vec<&'static str> {
        self.services.iter().map(|e| *e.key()).collect()
    }

    pub async fn dispatch(&self, ctx: SessionCtx, env: Envelope) {
        let Some(handler) = self
            .services
            .get(env.event.as_str())
            .map(|e| e.value().clone())
        else {
            tracing::debug!(event = %env.event, "ignoring unknown event");
            return;
        };

        if let Err(err) = handler.handle(ctx, env).await {
            tracing::debug!(error = %err, "dropping malformed event");
        }
    }
}
