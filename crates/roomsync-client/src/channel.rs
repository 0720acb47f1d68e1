//! Event channel abstraction.
//!
//! The session protocol only assumes ordered, reliable delivery of text
//! frames. [`WsChannel`] is the production implementation over
//! tokio-tungstenite; [`MemoryChannel`] is a paired in-memory channel for
//! tests and embedding.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use roomsync_core::{Result, RoomSyncError};

/// Ordered, reliable, bidirectional transport of encoded event frames.
#[async_trait]
pub trait EventChannel: Send + 'static {
    async fn send(&mut self, frame: String) -> Result<()>;
    /// `None` means the peer closed the channel in an orderly way.
    async fn recv(&mut self) -> Option<Result<String>>;
    async fn close(&mut self) -> Result<()>;
}

/// WebSocket channel to a relay.
pub struct WsChannel {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsChannel {
    /// Connect and complete the websocket handshake. A handshake failure
    /// is fatal to the session; the caller surfaces it to the user.
    pub async fn connect(url: &str) -> Result<Self> {
        let (inner, _response) = connect_async(url)
            .await
            .map_err(|e| RoomSyncError::Connect(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl EventChannel for WsChannel {
    async fn send(&mut self, frame: String) -> Result<()> {
        self.inner
            .send(WsMessage::Text(frame))
            .await
            .map_err(|_| RoomSyncError::ChannelClosed)
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        loop {
            match self.inner.next().await? {
                Ok(WsMessage::Text(s)) => return Some(Ok(s)),
                Ok(WsMessage::Close(_)) => return None,
                // ping/pong are answered by the stack; anything else is
                // not part of this protocol
                Ok(_) => continue,
                Err(_) => return Some(Err(RoomSyncError::ChannelClosed)),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        let _ = self.inner.close(None).await;
        Ok(())
    }
}

/// In-memory channel endpoint; create with [`memory_pair`].
pub struct MemoryChannel {
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
}

/// Two cross-wired in-memory endpoints: what one sends, the other receives.
pub fn memory_pair() -> (MemoryChannel, MemoryChannel) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (
        MemoryChannel { tx: a_tx, rx: a_rx },
        MemoryChannel { tx: b_tx, rx: b_rx },
    )
}

#[async_trait]
impl EventChannel for MemoryChannel {
    async fn send(&mut self, frame: String) -> Result<()> {
        self.tx.send(frame).map_err(|_| RoomSyncError::ChannelClosed)
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        self.rx.recv().await.map(Ok)
    }

    async fn close(&mut self) -> Result<()> {
        self.rx.close();
        Ok(())
    }
}
