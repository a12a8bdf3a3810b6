//! Record Format Module
//!
//! Byte-exact codecs for everything the store writes or indexes.
//!
//! ## Responsibilities
//! - Encode/decode the fixed 12-byte record header
//! - Encode/decode whole records (header + key + value)
//! - Encode/decode the 12-byte key directory entry
//!
//! No I/O happens here; every function is deterministic in its inputs.
//!
//! ## Log File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Record 1                                                 │
//! │ ┌───────────┬──────────┬────────────┬───────┬─────────┐  │
//! │ │ Time (4)  │ KeyLen(4)│ ValLen (4) │  Key  │  Value  │  │
//! │ └───────────┴──────────┴────────────┴───────┴─────────┘  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Record 2                                                 │
//! │ ┌───────────┬──────────┬────────────┬───────┬─────────┐  │
//! │ │ Time (4)  │ KeyLen(4)│ ValLen (4) │  Key  │  Value  │  │
//! │ └───────────┴──────────┴────────────┴───────┴─────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are u32 little-endian. There is no file header and no end
//! marker: the file is just records back to back.
//!
//! ## Key Directory Entry
//! ```text
//! ┌───────────┬────────────┬─────────────────┐
//! │ Time (4)  │ ValLen (4) │ ValueOffset (4) │
//! └───────────┴────────────┴─────────────────┘
//! ```
//! `ValueOffset` is the absolute file offset of the first value byte.

mod header;
mod keydir_entry;
mod record;

pub use header::{decode_header, encode_header, Header, HEADER_SIZE};
pub use keydir_entry::{
    decode_key_dir_entry, encode_key_dir_entry, KeyDirEntry, KEY_DIR_ENTRY_SIZE,
};
pub use record::{decode_record, encode_record, EncodedRecord, Record};

use crate::error::{LogKvError, Result};

/// Narrow a size, offset or timestamp to the on-disk u32 width
///
/// Values that do not fit are rejected rather than truncated.
pub(crate) fn fit_u32(field: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| LogKvError::Encoding { field, value })
}

/// Fail with `TruncatedInput` unless `bytes` holds at least `expected` bytes
pub(crate) fn ensure_len(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        return Err(LogKvError::TruncatedInput {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}
