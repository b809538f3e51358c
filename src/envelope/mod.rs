pub mod id;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::id::{NO_REPLY_ID, RequestId};

/// Unit exchanged in both directions: `{ "id": string, "role": bool, "data": any }`.
///
/// `role` is `true` for requests and posts (the sender originated the
/// exchange) and `false` for replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: RequestId,
    #[serde(rename = "role")]
    pub is_caller: bool,
    #[serde(default)]
    pub data: Value,
}

/// How an inbound envelope must be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeKind {
    /// One-way message, answered by nobody.
    Post(Value),
    /// The other party waits for a reply carrying `id`.
    Request { id: RequestId, data: Value },
    /// Answer to one of our own requests.
    Reply { id: RequestId, data: Value },
}

impl Envelope {
    pub fn post(data: Value) -> Self {
        Self {
            id: RequestId::no_reply(),
            is_caller: true,
            data,
        }
    }

    pub fn request(id: RequestId, data: Value) -> Self {
        Self {
            id,
            is_caller: true,
            data,
        }
    }

    pub fn reply(id: RequestId, data: Value) -> Self {
        Self {
            id,
            is_caller: false,
            data,
        }
    }

    /// Parse a candidate inbound value. Anything that is not an envelope
    /// yields `None`; the channel may carry foreign traffic.
    ///
    /// A missing `data` field reads as `null` and unknown fields are ignored.
    pub fn parse(raw: Value) -> Option<Self> {
        serde_json::from_value(raw).ok()
    }

    pub fn is_post(&self) -> bool {
        self.is_caller && self.id.is_no_reply()
    }

    pub fn is_reply(&self) -> bool {
        !self.is_caller
    }

    pub fn kind(self) -> EnvelopeKind {
        match (self.is_caller, self.id.is_no_reply()) {
            (true, true) => EnvelopeKind::Post(self.data),
            (true, false) => EnvelopeKind::Request {
                id: self.id,
                data: self.data,
            },
            (false, _) => EnvelopeKind::Reply {
                id: self.id,
                data: self.data,
            },
        }
    }
}
