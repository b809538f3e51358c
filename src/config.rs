use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::stats::DropReason;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Callback invoked for every inbound message the engine ignores.
pub type DropHook = Arc<dyn Fn(&DropReason) + Send + Sync>;

/// Construction-time settings for a [`Requester`](crate::Requester).
#[derive(Clone)]
pub struct RequesterConfig {
    /// How long `request` waits for a reply, measured once the send completed.
    pub timeout: Duration,
    pub drop_hook: Option<DropHook>,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            drop_hook: None,
        }
    }
}

impl fmt::Debug for RequesterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequesterConfig")
            .field("timeout", &self.timeout)
            .field("drop_hook", &self.drop_hook.is_some())
            .finish()
    }
}

impl RequesterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn with_drop_hook(mut self, hook: impl Fn(&DropReason) + Send + Sync + 'static) -> Self {
        self.drop_hook = Some(Arc::new(hook));
        self
    }
}
