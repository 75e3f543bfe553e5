//! Payload codec: bincode with a size cap.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Largest payload a pool will produce or accept.
pub const MAX_PAYLOAD_SIZE: usize = 4 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload too large: {size} > {max}")]
    TooLarge { size: usize, max: usize },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub fn encode(value: &impl Serialize) -> Result<Vec<u8>, CodecError> {
    let bytes = bincode::serialize(value).map_err(|e| CodecError::Malformed(e.to_string()))?;
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(CodecError::TooLarge {
            size: bytes.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(bytes)
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError> {
    if data.len() > MAX_PAYLOAD_SIZE {
        return Err(CodecError::TooLarge {
            size: data.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    bincode::deserialize(data).map_err(|e| CodecError::Malformed(e.to_string()))
}
