use std::time::Duration;
use thiserror::Error;

use crate::envelope::RequestId;

/// Error type returned by collaborators (`send` / `respond`).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Request {id} timed out after {timeout:?}")]
    Timeout { id: RequestId, timeout: Duration },

    #[error("Send failed: {0}")]
    SendFailed(#[source] BoxError),

    #[error("Responder failed: {0}")]
    RespondFailed(#[source] BoxError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RequestError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Timeout { .. })
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Transport closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, RequestError>;
pub type TransportResult<T> = std::result::Result<T, TransportError>;

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Serialization(err.to_string())
    }
}
