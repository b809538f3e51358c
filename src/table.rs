use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::envelope::RequestId;
use crate::error::{RequestError, Result};

/// Outstanding requests keyed by id.
///
/// A present entry is an unfulfilled reservation. `fulfill` removes the entry
/// and hands the payload to the waiter, so a second reply for the same id
/// finds nothing and is dropped.
#[derive(Debug, Default)]
pub struct CorrelationTable {
    slots: Mutex<HashMap<RequestId, oneshot::Sender<Value>>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, id: &RequestId) -> bool {
        self.slots.lock().contains_key(id)
    }

    /// Register `id` as unfulfilled. Returns `None` if it is already reserved.
    pub fn reserve(self: &Arc<Self>, id: RequestId) -> Option<PendingReply> {
        let (tx, rx) = oneshot::channel();
        match self.slots.lock().entry(id.clone()) {
            Entry::Occupied(_) => return None,
            Entry::Vacant(slot) => {
                slot.insert(tx);
            }
        }

        Some(PendingReply {
            id,
            rx,
            table: self.clone(),
        })
    }

    /// Reserve a freshly generated id, regenerating on collision.
    pub fn reserve_unique(self: &Arc<Self>) -> PendingReply {
        loop {
            let id = RequestId::generate();
            if self.exists(&id) {
                continue;
            }
            if let Some(pending) = self.reserve(id) {
                return pending;
            }
        }
    }

    /// Deliver a reply. Returns `false` when no waiter holds `id` (unknown,
    /// already consumed or timed out).
    pub fn fulfill(&self, id: &RequestId, data: Value) -> bool {
        // Send under the lock so a concurrent `release` + `try_consume` sees
        // either the slot or the delivered payload, never neither.
        let mut slots = self.slots.lock();
        match slots.remove(id) {
            Some(tx) => tx.send(data).is_ok(),
            None => false,
        }
    }

    /// Drop a reservation without fulfilling it.
    pub fn release(&self, id: &RequestId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

/// Waiter side of a reservation. Dropping it releases the id.
#[derive(Debug)]
pub struct PendingReply {
    id: RequestId,
    rx: oneshot::Receiver<Value>,
    table: Arc<CorrelationTable>,
}

impl PendingReply {
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Take the reply if it has arrived, without waiting.
    pub fn try_consume(&mut self) -> Option<Value> {
        self.rx.try_recv().ok()
    }

    /// Wait for the reply until `timeout` elapses, then consume it exactly once.
    ///
    /// A slot released by someone other than this waiter closes the channel
    /// early; that is reported as a timeout since no reply can arrive anymore.
    pub async fn consume(mut self, timeout: Duration) -> Result<Value> {
        if let Ok(Ok(data)) = tokio::time::timeout(timeout, &mut self.rx).await {
            return Ok(data);
        }

        self.table.release(&self.id);
        // A reply that won the race against the release is still ours.
        match self.try_consume() {
            Some(data) => Ok(data),
            None => Err(RequestError::Timeout {
                id: self.id.clone(),
                timeout,
            }),
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.table.release(&self.id);
    }
}
