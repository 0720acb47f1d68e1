use async_trait::async_trait;
use serde_json::json;

use roomsync_core::protocol::envelope::{encode, Envelope};
use roomsync_core::protocol::events::{self, ContentChangeData, SyncRequestData};
use roomsync_core::{Result, RoomSyncError};

use crate::dispatch::RoomService;
use crate::rooms::SessionCtx;

/// Document edit pass-through. The relay never inspects or merges the
/// content; it re-broadcasts it to the room minus the sender, who already
/// holds the edit locally.
#[derive(Default)]
pub struct ContentChangeService;

impl ContentChangeService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoomService for ContentChangeService {
    fn event(&self) -> &'static str {
        events::CONTENT_CHANGE
    }

    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        let room = env
            .room
            .clone()
            .ok_or_else(|| RoomSyncError::BadRequest("content_change requires room".into()))?;
        let req: ContentChangeData = env.payload()?;

        let frame = encode(
            events::CONTENT_CHANGE,
            Some(&room),
            Some(json!({ "content": req.content })),
        );
        ctx.publish_room_except(&room, ctx.conn_id(), &frame).await;
        Ok(())
    }
}

/// Targeted late-join snapshot forwarding. The sender names the target
/// connection; the relay stamps the sender identity and forwards. A gone
/// or unknown target is dropped silently: duplicates and races against
/// disconnects are expected in the multi-sender sync design.
#[derive(Default)]
pub struct SyncContentService;

impl SyncContentService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoomService for SyncContentService {
    fn event(&self) -> &'static str {
        events::SYNC_CONTENT
    }

    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        let req: SyncRequestData = env.payload()?;

        let frame = encode(
            events::SYNC_CONTENT,
            None,
            Some(json!({
                "content": req.content,
                "identity": ctx.conn_id(),
            })),
        );
        if !ctx.send_to(&req.target, &frame).await {
            tracing::debug!(target = %req.target, "sync target not connected");
        }
        Ok(())
    }
}
