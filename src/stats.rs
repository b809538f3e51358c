use crate::envelope::RequestId;

/// Why an inbound message was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Not an envelope: foreign traffic or an undecodable frame.
    Malformed,
    /// A reply whose id no request is waiting on (timed out, consumed or unknown).
    StaleReply { id: RequestId },
}

/// Counters collected by a [`Requester`](crate::Requester).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequesterStats {
    pub posts_sent: u64,
    pub requests_sent: u64,
    pub replies_sent: u64,
    pub replies_received: u64,
    pub posts_handled: u64,
    pub requests_handled: u64,
    pub timeouts: u64,
    pub stale_replies: u64,
    pub malformed: u64,
}

impl RequesterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dropped(&self) -> u64 {
        self.stale_replies + self.malformed
    }

    pub(crate) fn record_drop(&mut self, reason: &DropReason) {
        match reason {
            DropReason::Malformed => self.malformed += 1,
            DropReason::StaleReply { .. } => self.stale_replies += 1,
        }
    }
}

impl std::fmt::Display for RequesterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Requester Statistics:")?;
        writeln!(f, "  Posts sent:        {}", self.posts_sent)?;
        writeln!(f, "  Requests sent:     {}", self.requests_sent)?;
        writeln!(f, "  Replies sent:      {}", self.replies_sent)?;
        writeln!(f, "  Replies received:  {}", self.replies_received)?;
        writeln!(f, "  Posts handled:     {}", self.posts_handled)?;
        writeln!(f, "  Requests handled:  {}", self.requests_handled)?;
        writeln!(f, "  Timeouts:          {}", self.timeouts)?;
        writeln!(f, "  Stale replies:     {}", self.stale_replies)?;
        writeln!(f, "  Malformed:         {}", self.malformed)?;
        Ok(())
    }
}
