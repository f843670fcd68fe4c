//! MessagePack encoding of [`Link`] records.
//!
//! The same bytes are written to the primary partition and to the author's
//! partition, so both copies always decode to the same record.

use thiserror::Error;

use super::models::Link;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Serialization error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Deserialization error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

pub fn encode(link: &Link) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(link)?)
}

/// Fails on malformed, truncated or schema-mismatched bytes.
pub fn decode(data: &[u8]) -> Result<Link, CodecError> {
    Ok(rmp_serde::from_slice(data)?)
}
