use crate::error::Result;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for encoding and decoding envelopes to and from byte frames.
///
/// Payloads are schemaless, so only self-describing formats can decode them.
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// Encode a serializable value into bytes
    fn encode<T: Serialize>(&self, data: &T) -> Result<Vec<u8>>;

    /// Decode bytes into a deserializable value
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T>;
}

/// Default codec (JSON codec)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, data: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(data)?)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(data)?)
    }
}
