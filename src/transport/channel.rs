use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::{TransportError, TransportResult};
use crate::transport::Transport;

/// In-process frame transport. Each end of a pair receives what the other sends.
pub struct ChannelTransport {
    sender: Mutex<Option<UnboundedSender<Bytes>>>,
    receiver: tokio::sync::Mutex<UnboundedReceiver<Bytes>>,
    name: String,
}

impl ChannelTransport {
    /// Create a pair of connected transports.
    pub fn create_pair(name: impl Into<String>) -> (Self, Self) {
        let name = name.into();

        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();

        let transport1 = Self {
            sender: Mutex::new(Some(tx1)),
            receiver: tokio::sync::Mutex::new(rx2),
            name: format!("{}-a", name),
        };

        let transport2 = Self {
            sender: Mutex::new(Some(tx2)),
            receiver: tokio::sync::Mutex::new(rx1),
            name: format!("{}-b", name),
        };

        (transport1, transport2)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, data: &[u8]) -> TransportResult<()> {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(tx) => tx
                .send(Bytes::copy_from_slice(data))
                .map_err(|_| TransportError::Closed),
            None => Err(TransportError::Closed),
        }
    }

    async fn recv(&self) -> TransportResult<Bytes> {
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or(TransportError::Closed)
    }

    fn is_connected(&self) -> bool {
        self.sender
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Stops sending; the peer's `recv` fails once buffered frames are drained.
    async fn close(&self) -> TransportResult<()> {
        self.sender.lock().take();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ChannelTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelTransport")
            .field("name", &self.name)
            .finish()
    }
}
