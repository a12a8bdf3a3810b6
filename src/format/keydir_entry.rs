//! Key directory entry codec

use bytes::{Buf, BufMut};

use crate::error::{LogKvError, Result};

use super::fit_u32;

/// Entry size: Timestamp (4) + ValueSize (4) + ValueOffset (4) = 12 bytes
pub const KEY_DIR_ENTRY_SIZE: usize = 12;

/// Location of a key's current value inside the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDirEntry {
    /// Timestamp of the record that wrote the value
    pub timestamp: u32,

    /// Length of the value in bytes
    pub value_size: u32,

    /// Absolute offset of the first value byte from the start of the file.
    /// Never the record start: header and key are already skipped.
    pub value_offset: u32,
}

impl KeyDirEntry {
    /// Build an entry, rejecting any field wider than 32 bits
    pub fn new(timestamp: u64, value_size: u64, value_offset: u64) -> Result<Self> {
        Ok(Self {
            timestamp: fit_u32("timestamp", timestamp)?,
            value_size: fit_u32("value_size", value_size)?,
            value_offset: fit_u32("value_offset", value_offset)?,
        })
    }

    pub fn encode(&self) -> [u8; KEY_DIR_ENTRY_SIZE] {
        let mut buf = [0u8; KEY_DIR_ENTRY_SIZE];
        let mut cursor = &mut buf[..];
        cursor.put_u32_le(self.timestamp);
        cursor.put_u32_le(self.value_size);
        cursor.put_u32_le(self.value_offset);
        buf
    }

    pub fn from_bytes(bytes: &[u8; KEY_DIR_ENTRY_SIZE]) -> Self {
        let mut cursor = &bytes[..];
        let timestamp = cursor.get_u32_le();
        let value_size = cursor.get_u32_le();
        let value_offset = cursor.get_u32_le();
        Self {
            timestamp,
            value_size,
            value_offset,
        }
    }

    /// Offset one past the last value byte
    pub fn value_end(&self) -> u64 {
        u64::from(self.value_offset) + u64::from(self.value_size)
    }
}

/// Encode a key directory entry from raw field values
pub fn encode_key_dir_entry(
    timestamp: u64,
    value_size: u64,
    value_offset: u64,
) -> Result<[u8; KEY_DIR_ENTRY_SIZE]> {
    Ok(KeyDirEntry::new(timestamp, value_size, value_offset)?.encode())
}

/// Decode a key directory entry from the first 12 bytes of `bytes`
pub fn decode_key_dir_entry(bytes: &[u8]) -> Result<KeyDirEntry> {
    let fixed = bytes
        .first_chunk::<KEY_DIR_ENTRY_SIZE>()
        .ok_or(LogKvError::TruncatedInput {
            expected: KEY_DIR_ENTRY_SIZE,
            actual: bytes.len(),
        })?;
    Ok(KeyDirEntry::from_bytes(fixed))
}
