//! Record codec
//!
//! A record is a header followed by the raw key bytes and the raw value
//! bytes. Sizes are byte lengths of the UTF-8 encoding, not character counts.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;

use super::{decode_header, ensure_len, fit_u32, Header, HEADER_SIZE};

/// A record ready to be appended, plus what the key directory needs from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    /// Full on-disk bytes: header + key + value
    pub record: Bytes,

    /// Where the value starts, relative to the start of this record
    /// (header size + key length). The store adds its write position to
    /// turn this into an absolute file offset.
    pub value_offset: u32,

    /// Length of the value in bytes
    pub value_size: u32,
}

impl EncodedRecord {
    /// On-disk length of the record
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub header: Header,
    pub key: String,
    pub value: String,
}

/// Encode a record for appending to the log
pub fn encode_record(timestamp: u64, key: &str, value: &str) -> Result<EncodedRecord> {
    let key = key.as_bytes();
    let value = value.as_bytes();

    let header = Header::new(timestamp, key.len() as u64, value.len() as u64)?;
    let value_offset = fit_u32("value_offset", (HEADER_SIZE + key.len()) as u64)?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + key.len() + value.len());
    buf.put_slice(&header.encode());
    buf.put_slice(key);
    buf.put_slice(value);

    Ok(EncodedRecord {
        record: buf.freeze(),
        value_offset,
        value_size: header.value_size,
    })
}

/// Decode a record from the start of `bytes`
///
/// Bytes past the end of the record are ignored. Key and value are decoded
/// as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_record(bytes: &[u8]) -> Result<Record> {
    let header = decode_header(bytes)?;

    let key_end = HEADER_SIZE + header.key_size as usize;
    let value_end = key_end + header.value_size as usize;
    ensure_len(bytes, value_end)?;

    let key = String::from_utf8_lossy(&bytes[HEADER_SIZE..key_end]).into_owned();
    let value = String::from_utf8_lossy(&bytes[key_end..value_end]).into_owned();

    Ok(Record { header, key, value })
}
