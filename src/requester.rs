use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::codec::Codec;
use crate::collaborator::{FnOutbound, FnResponder, Outbound, Responder};
use crate::config::RequesterConfig;
use crate::envelope::{Envelope, EnvelopeKind};
use crate::error::{BoxError, RequestError, Result};
use crate::stats::{DropReason, RequesterStats};
use crate::table::CorrelationTable;

/// Request/response engine for one channel.
///
/// `U` is the caller-defined context handed through to the outbound
/// collaborator together with every envelope.
pub struct Requester<U = ()>
where
    U: Send + 'static,
{
    outbound: Arc<dyn Outbound<U>>,
    responder: Arc<dyn Responder>,
    table: Arc<CorrelationTable>,
    config: RequesterConfig,
    stats: Mutex<RequesterStats>,
}

impl<U: Send + 'static> Requester<U> {
    pub fn new<O, R>(outbound: O, responder: R) -> Self
    where
        O: Outbound<U> + 'static,
        R: Responder + 'static,
    {
        Self::with_config(outbound, responder, RequesterConfig::default())
    }

    pub fn with_config<O, R>(outbound: O, responder: R, config: RequesterConfig) -> Self
    where
        O: Outbound<U> + 'static,
        R: Responder + 'static,
    {
        Self {
            outbound: Arc::new(outbound),
            responder: Arc::new(responder),
            table: Arc::new(CorrelationTable::new()),
            config,
            stats: Mutex::new(RequesterStats::new()),
        }
    }

    /// Build an engine from a `send` closure and a `respond` closure.
    pub fn from_fns<S, SFut, R, RFut>(send: S, respond: R) -> Self
    where
        S: Fn(Envelope, Option<U>) -> SFut + Send + Sync + 'static,
        SFut: Future<Output = std::result::Result<(), BoxError>> + Send + 'static,
        R: Fn(Value) -> RFut + Send + Sync + 'static,
        RFut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
    {
        Self::new(FnOutbound::new(send), FnResponder::new(respond))
    }

    /// Install a callback invoked for every inbound message that is ignored.
    ///
    /// Same as [`RequesterConfig::with_drop_hook`], for engines built without
    /// an explicit config.
    pub fn on_drop(mut self, hook: impl Fn(&DropReason) + Send + Sync + 'static) -> Self {
        self.config = self.config.with_drop_hook(hook);
        self
    }

    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    pub fn stats(&self) -> RequesterStats {
        self.stats.lock().clone()
    }

    pub fn pending_requests(&self) -> usize {
        self.table.len()
    }

    /// Fire-and-forget: one outbound envelope carrying the no-reply id.
    pub async fn post(&self, data: Value, context: Option<U>) -> Result<()> {
        let envelope = Envelope::post(data);
        trace!(id = %envelope.id, "Sending post");
        self.outbound
            .send(envelope, context)
            .await
            .map_err(RequestError::SendFailed)?;

        self.stats.lock().posts_sent += 1;
        Ok(())
    }

    pub async fn post_as<T: Serialize>(&self, data: &T, context: Option<U>) -> Result<()> {
        self.post(serde_json::to_value(data)?, context).await
    }

    /// Send `data` and wait for the correlated reply, up to the configured timeout.
    pub async fn request(&self, data: Value, context: Option<U>) -> Result<Value> {
        self.request_with_timeout(data, context, self.config.timeout)
            .await
    }

    pub async fn request_with_timeout(
        &self,
        data: Value,
        context: Option<U>,
        timeout: Duration,
    ) -> Result<Value> {
        // Reserved before sending: the reply may arrive before `send` returns.
        let pending = self.table.reserve_unique();
        let id = pending.id().clone();

        trace!(%id, "Sending request");
        self.outbound
            .send(Envelope::request(id.clone(), data), context)
            .await
            .map_err(RequestError::SendFailed)?;
        self.stats.lock().requests_sent += 1;

        match pending.consume(timeout).await {
            Ok(reply) => {
                self.stats.lock().replies_received += 1;
                Ok(reply)
            }
            Err(e) => {
                if e.is_timeout() {
                    self.stats.lock().timeouts += 1;
                    debug!(%id, ?timeout, "Request timed out");
                }
                Err(e)
            }
        }
    }

    pub async fn request_as<Req, Resp>(&self, data: &Req, context: Option<U>) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let reply = self.request(serde_json::to_value(data)?, context).await?;
        Ok(serde_json::from_value(reply)?)
    }

    /// Single entry point for anything arriving on the channel.
    ///
    /// Values that are not envelopes and replies nobody waits for are dropped
    /// without error. Collaborator failures are returned.
    pub async fn on_message(&self, raw: Value, context: Option<U>) -> Result<()> {
        match Envelope::parse(raw) {
            Some(envelope) => self.on_envelope(envelope, context).await,
            None => {
                self.report_drop(DropReason::Malformed);
                Ok(())
            }
        }
    }

    /// Decode a byte frame with `codec` and dispatch it like [`Self::on_message`].
    pub async fn on_bytes<C: Codec>(
        &self,
        codec: &C,
        frame: &[u8],
        context: Option<U>,
    ) -> Result<()> {
        match codec.decode::<Value>(frame) {
            Ok(raw) => self.on_message(raw, context).await,
            Err(e) => {
                debug!(error = %e, len = frame.len(), "Undecodable frame");
                self.report_drop(DropReason::Malformed);
                Ok(())
            }
        }
    }

    pub async fn on_envelope(&self, envelope: Envelope, context: Option<U>) -> Result<()> {
        match envelope.kind() {
            EnvelopeKind::Post(data) => {
                self.responder
                    .respond(data)
                    .await
                    .map_err(RequestError::RespondFailed)?;
                self.stats.lock().posts_handled += 1;
            }
            EnvelopeKind::Request { id, data } => {
                let result = self
                    .responder
                    .respond(data)
                    .await
                    .map_err(RequestError::RespondFailed)?;
                self.stats.lock().requests_handled += 1;

                trace!(%id, "Sending reply");
                self.outbound
                    .send(Envelope::reply(id, result), context)
                    .await
                    .map_err(RequestError::SendFailed)?;
                self.stats.lock().replies_sent += 1;
            }
            EnvelopeKind::Reply { id, data } => {
                if !self.table.fulfill(&id, data) {
                    self.report_drop(DropReason::StaleReply { id });
                }
            }
        }
        Ok(())
    }

    fn report_drop(&self, reason: DropReason) {
        debug!(?reason, "Dropping inbound message");
        self.stats.lock().record_drop(&reason);
        if let Some(hook) = &self.config.drop_hook {
            hook(&reason);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_reserved(&self, id: &crate::envelope::RequestId) -> bool {
        self.table.exists(id)
    }
}

impl<U: Send + 'static> Debug for Requester<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("timeout", &self.config.timeout)
            .field("pending_requests", &self.table.len())
            .field("stats", &*self.stats.lock())
            .finish()
    }
}
