//! Record codec
//!
//! Converts records to and from the payload part of a journal line.
//!
//! ## Payload Rules
//! - A payload must be a single line: no `\n` bytes
//! - Decoding starts from `R::default()` and fills it in
//! - The encoding must carry the record identifier

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{JotError, Result};
use crate::record::Record;

/// Pluggable serialization for journal payloads
pub trait Codec<R: Record> {
    /// Encode a record into a payload
    fn encode(&self, record: &R) -> Result<Vec<u8>>;

    /// Decode a payload into an empty record produced by the factory
    fn decode_into(&self, payload: &[u8], record: &mut R) -> Result<()>;

    /// Decode a payload into a freshly constructed record
    fn decode(&self, payload: &[u8]) -> Result<R> {
        let mut record = R::default();
        self.decode_into(payload, &mut record)?;
        Ok(record)
    }
}

/// Compact JSON codec (the default)
///
/// `serde_json` never emits raw newlines in compact mode, so every encoded
/// record fits on one journal line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<R> Codec<R> for JsonCodec
where
    R: Record + Serialize + DeserializeOwned,
{
    fn encode(&self, record: &R) -> Result<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| JotError::Serialization(e.to_string()))
    }

    fn decode_into(&self, payload: &[u8], record: &mut R) -> Result<()> {
        *record =
            serde_json::from_slice(payload).map_err(|e| JotError::Serialization(e.to_string()))?;
        Ok(())
    }
}
