use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::codec::{Codec, JsonCodec};
use crate::collaborator::{Outbound, Responder};
use crate::config::RequesterConfig;
use crate::envelope::Envelope;
use crate::error::BoxError;
use crate::requester::Requester;
use crate::transport::Transport;

/// `Outbound` that encodes envelopes with a codec and writes them as frames.
#[derive(Debug)]
pub struct TransportOutbound<T: Transport, C: Codec = JsonCodec> {
    transport: Arc<T>,
    codec: C,
}

impl<T: Transport> TransportOutbound<T, JsonCodec> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            codec: JsonCodec,
        }
    }
}

impl<T: Transport, C: Codec> TransportOutbound<T, C> {
    pub fn with_codec(transport: Arc<T>, codec: C) -> Self {
        Self { transport, codec }
    }

    pub fn transport(&self) -> Arc<T> {
        self.transport.clone()
    }
}

#[async_trait]
impl<U, T, C> Outbound<U> for TransportOutbound<T, C>
where
    U: Send + 'static,
    T: Transport,
    C: Codec,
{
    async fn send(&self, envelope: Envelope, _context: Option<U>) -> Result<(), BoxError> {
        let frame = self.codec.encode(&envelope)?;
        self.transport.send(&frame).await?;
        Ok(())
    }
}

/// Feed every frame received on `transport` into `requester`.
///
/// Each frame is handled on its own task, so a responder that itself issues
/// requests over the same channel can receive its replies.
pub fn spawn_listener<U, T, C>(
    requester: Arc<Requester<U>>,
    transport: Arc<T>,
    codec: C,
) -> ListenerHandle
where
    U: Send + 'static,
    T: Transport + 'static,
    C: Codec + Clone + 'static,
{
    let handle = tokio::spawn(async move {
        loop {
            match transport.recv().await {
                Ok(frame) => {
                    let requester = requester.clone();
                    let codec = codec.clone();
                    tokio::spawn(async move {
                        if let Err(e) = requester.on_bytes(&codec, &frame, None).await {
                            warn!(error = %e, "Inbound message handling failed");
                        }
                    });
                }
                Err(e) => {
                    debug!(transport = transport.name(), error = %e, "Listener stopped");
                    break;
                }
            }
        }
    });

    ListenerHandle { handle }
}

/// Build an engine that sends over `transport` and start listening on it.
pub fn attach<T, R>(
    transport: Arc<T>,
    responder: R,
    config: RequesterConfig,
) -> (Arc<Requester>, ListenerHandle)
where
    T: Transport + 'static,
    R: Responder + 'static,
{
    let outbound = TransportOutbound::new(transport.clone());
    let requester = Arc::new(Requester::with_config(outbound, responder, config));
    let listener = spawn_listener(requester.clone(), transport, JsonCodec);
    (requester, listener)
}

pub struct ListenerHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl ListenerHandle {
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
