//! Batched writes
//!
//! `set_many` trades per-record durability for throughput: records are
//! appended one by one but the sync, and the key directory update that must
//! follow it, happen once per chunk of appended bytes.

use tracing::{debug, warn};

use crate::error::Result;
use crate::format::{encode_record, KeyDirEntry};
use crate::keydir::KeyDir;

use super::{LogStore, OpenLog, StoreStats};

impl LogStore {
    /// Store many key-value pairs with one shared timestamp
    ///
    /// After each append the write position advances and the record's entry
    /// is queued. Once more than `config.batch_sync_bytes` bytes have been
    /// appended since the last sync, the file is synced and the queue is
    /// committed to the key directory. A final sync and commit always runs
    /// after the last pair, whether or not the threshold was reached.
    ///
    /// On failure, records appended since the last commit may be on disk but
    /// stay unreachable through the key directory. Earlier chunks remain
    /// committed. A record whose append fails is cut from the file.
    pub fn set_many<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let log = self.state.open_mut("set_many")?;

        let timestamp = self.clock.now_secs();
        let threshold = self.config.batch_sync_bytes;

        let mut pending: Vec<(String, KeyDirEntry)> = Vec::new();
        let mut byte_count = 0usize;

        for (key, value) in pairs {
            let key: String = key.into();
            let encoded = encode_record(timestamp, &key, value.as_ref())?;
            let entry = log.entry_for(timestamp, &encoded)?;

            if let Err(e) = log.append(&encoded.record) {
                warn!(
                    key = %key,
                    offset = log.write_position,
                    uncommitted = pending.len(),
                    error = %e,
                    "batch append failed"
                );
                log.discard_tail();
                return Err(e);
            }
            log.advance(encoded.len());
            self.stats.records_appended += 1;
            self.stats.bytes_appended += encoded.len() as u64;

            pending.push((key, entry));
            byte_count += encoded.len();

            if byte_count > threshold {
                sync_and_commit(log, &mut self.key_dir, &mut self.stats, &mut pending)?;
                byte_count = 0;
            }
        }

        // Runs even when the loop just committed or the input was empty
        sync_and_commit(log, &mut self.key_dir, &mut self.stats, &mut pending)
    }
}

/// Sync the log, then move every pending entry into the key directory
fn sync_and_commit(
    log: &OpenLog,
    key_dir: &mut KeyDir,
    stats: &mut StoreStats,
    pending: &mut Vec<(String, KeyDirEntry)>,
) -> Result<()> {
    if let Err(e) = log.sync() {
        warn!(uncommitted = pending.len(), error = %e, "batch sync failed");
        return Err(e);
    }
    stats.syncs += 1;

    let committed = pending.len();
    key_dir.commit(pending.drain(..));
    stats.batch_commits += 1;

    debug!(
        committed,
        write_position = log.write_position,
        "batch chunk committed"
    );
    Ok(())
}
