//! Record header codec
//!
//! Every record starts with the same fixed-size header.

use bytes::{Buf, BufMut};

use crate::error::{LogKvError, Result};

use super::fit_u32;

/// Header size: Timestamp (4) + KeySize (4) + ValueSize (4) = 12 bytes
pub const HEADER_SIZE: usize = 12;

/// Fixed-size metadata prefix of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Write time in whole seconds since the Unix epoch
    pub timestamp: u32,

    /// Length of the key in bytes
    pub key_size: u32,

    /// Length of the value in bytes
    pub value_size: u32,
}

impl Header {
    /// Build a header, rejecting any field wider than 32 bits
    pub fn new(timestamp: u64, key_size: u64, value_size: u64) -> Result<Self> {
        Ok(Self {
            timestamp: fit_u32("timestamp", timestamp)?,
            key_size: fit_u32("key_size", key_size)?,
            value_size: fit_u32("value_size", value_size)?,
        })
    }

    /// Serialize to the 12-byte little-endian layout
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let mut cursor = &mut buf[..];
        cursor.put_u32_le(self.timestamp);
        cursor.put_u32_le(self.key_size);
        cursor.put_u32_le(self.value_size);
        buf
    }

    /// Parse a header from exactly 12 bytes
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut cursor = &bytes[..];
        let timestamp = cursor.get_u32_le();
        let key_size = cursor.get_u32_le();
        let value_size = cursor.get_u32_le();
        Self {
            timestamp,
            key_size,
            value_size,
        }
    }

    /// Total on-disk length of the record this header describes
    pub fn record_len(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.key_size) + u64::from(self.value_size)
    }
}

/// Encode a header from raw field values
pub fn encode_header(timestamp: u64, key_size: u64, value_size: u64) -> Result<[u8; HEADER_SIZE]> {
    Ok(Header::new(timestamp, key_size, value_size)?.encode())
}

/// Decode a header from the first 12 bytes of `bytes`
///
/// Extra trailing bytes are ignored.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    let fixed = bytes
        .first_chunk::<HEADER_SIZE>()
        .ok_or(LogKvError::TruncatedInput {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        })?;
    Ok(Header::from_bytes(fixed))
}
