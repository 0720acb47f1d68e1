use async_trait::async_trait;
use serde_json::json;

use roomsync_core::protocol::envelope::{encode, Envelope};
use roomsync_core::protocol::events::{self, ChatSendData};
use roomsync_core::{Result, RoomSyncError};

use crate::dispatch::RoomService;
use crate::rooms::SessionCtx;

/// Stateless chat pass-through. Messages are echoed to every current
/// member of the requested room, sender included; transcripts are built
/// purely from delivery order, so all members see the same one. The relay
/// stamps the author from the sender's membership record and does not
/// validate message content.
#[derive(Default)]
pub struct ChatService;

impl ChatService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoomService for ChatService {
    fn event(&self) -> &'static str {
        events::CHAT
    }

    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        let room = env
            .room
            .clone()
            .ok_or_else(|| RoomSyncError::BadRequest("chat requires room".into()))?;
        let req: ChatSendData = env.payload()?;

        let Some(member) = ctx.core().rooms.member(ctx.conn_id()) else {
            tracing::debug!(conn = %ctx.conn_id(), "chat from connection with no membership");
            return Ok(());
        };

        let frame = encode(
            events::CHAT,
            Some(&room),
            Some(json!({
                "author": member.display_name,
                "text": req.text,
            })),
        );
        ctx.publish_room(&room, &frame).await;
        Ok(())
    }
}
