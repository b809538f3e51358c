use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::error::TransportResult;

pub mod bridge;
pub mod channel;

pub use bridge::{ListenerHandle, TransportOutbound, attach, spawn_listener};

/// One-way frame channel an engine can be attached to.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send one frame to the remote party
    async fn send(&self, data: &[u8]) -> TransportResult<()>;

    /// Receive the next frame
    async fn recv(&self) -> TransportResult<Bytes>;

    /// Check if the transport is connected
    fn is_connected(&self) -> bool;

    /// Close the transport
    async fn close(&self) -> TransportResult<()>;

    /// Get transport name/identifier
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, data: &[u8]) -> TransportResult<()> {
        (**self).send(data).await
    }

    async fn recv(&self) -> TransportResult<Bytes> {
        (**self).recv().await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn close(&self) -> TransportResult<()> {
        (**self).close().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
