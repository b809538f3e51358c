use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved id carried by posts: no reply is expected and nothing is awaited.
pub const NO_REPLY_ID: &str = "-1";

/// Correlation identifier carried on the wire as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Random 128-bit id. Uniqueness against outstanding requests is checked
    /// by the correlation table, not assumed here.
    pub fn generate() -> Self {
        RequestId(Uuid::new_v4().simple().to_string())
    }

    pub fn no_reply() -> Self {
        RequestId(NO_REPLY_ID.to_string())
    }

    pub fn is_no_reply(&self) -> bool {
        self.0 == NO_REPLY_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId(id.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
