//! Log Store Module
//!
//! The append-only store that ties the record format, the log file and the
//! key directory together.
//!
//! ## Responsibilities
//! - Create the log file (never reuse an existing one)
//! - Append records and sync them before indexing
//! - Track the write position so every indexed offset is exact
//! - Serve reads straight from the value's byte range
//!
//! ## Lifecycle
//! ```text
//!   ┌───────────────┐  initialize()  ┌────────┐
//!   │ Uninitialized │ ─────────────▶ │  Open  │ ── set / set_many / get
//!   └───────────────┘                └────────┘
//! ```
//! Data operations on an uninitialized store fail with `IllegalState`.

mod batch;
pub mod files;

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{LogKvError, Result};
use crate::fio::{FileIo, LogIo};
use crate::format::{encode_record, EncodedRecord, KeyDirEntry};
use crate::keydir::KeyDir;

pub use files::file_exists;

/// Counters describing what a store has written so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Records successfully appended (committed or not)
    pub records_appended: u64,

    /// Bytes successfully appended
    pub bytes_appended: u64,

    /// Successful syncs to stable storage
    pub syncs: u64,

    /// Times `set_many` moved pending entries into the key directory
    pub batch_commits: u64,
}

/// Whether the store holds a log file yet
enum StoreState {
    Uninitialized,
    Open(OpenLog),
}

impl StoreState {
    fn open(&self, op: &str) -> Result<&OpenLog> {
        match self {
            StoreState::Open(log) => Ok(log),
            StoreState::Uninitialized => Err(not_initialized(op)),
        }
    }

    fn open_mut(&mut self, op: &str) -> Result<&mut OpenLog> {
        match self {
            StoreState::Open(log) => Ok(log),
            StoreState::Uninitialized => Err(not_initialized(op)),
        }
    }
}

fn not_initialized(op: &str) -> LogKvError {
    LogKvError::IllegalState(format!("{op} called before initialize"))
}

/// The open log file and the position the next record lands at
struct OpenLog {
    io: Box<dyn LogIo>,

    /// Bytes appended so far. Equals the file length as seen by the store.
    write_position: u64,
}

impl OpenLog {
    fn new(io: Box<dyn LogIo>) -> Self {
        Self {
            io,
            write_position: 0,
        }
    }

    /// Key directory entry for `encoded` if it is appended at the current
    /// write position
    fn entry_for(&self, timestamp: u64, encoded: &EncodedRecord) -> Result<KeyDirEntry> {
        KeyDirEntry::new(
            timestamp,
            u64::from(encoded.value_size),
            self.write_position + u64::from(encoded.value_offset),
        )
    }

    /// Write `bytes` at the write position without advancing it
    fn append(&self, bytes: &[u8]) -> Result<()> {
        self.io
            .write_at(bytes, self.write_position)
            .map_err(LogKvError::Write)
    }

    fn sync(&self) -> Result<()> {
        self.io.sync().map_err(LogKvError::Write)
    }

    fn advance(&mut self, len: usize) {
        self.write_position += len as u64;
    }

    /// Cut the file back to the write position after a failed write
    ///
    /// A rollback failure is logged; the caller still reports the original
    /// error.
    fn discard_tail(&self) {
        if let Err(e) = self.io.truncate(self.write_position) {
            warn!(
                write_position = self.write_position,
                error = %e,
                "failed to discard partial record"
            );
        }
    }
}

/// A single-file, append-only key-value store
///
/// ## Concurrency Model: Single Writer
///
/// - Writes (`set`, `set_many`) take `&mut self`: callers serialize them.
/// - Reads (`get`) take `&self`.
/// - The only lock is around the file cursor inside the I/O backend.
pub struct LogStore {
    /// Store configuration
    config: Config,

    /// Source of record timestamps
    clock: Box<dyn Clock>,

    /// Uninitialized until `initialize` creates the log file
    state: StoreState,

    /// Key → location of its latest value
    key_dir: KeyDir,

    /// Write counters
    stats: StoreStats,
}

impl fmt::Debug for LogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStore")
            .field("config", &self.config)
            .field("write_position", &self.write_position())
            .field("keys", &self.key_dir.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl LogStore {
    /// Create an uninitialized store using the system clock
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create an uninitialized store with a custom clock
    pub fn with_clock(config: Config, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: StoreState::Uninitialized,
            key_dir: KeyDir::new(),
            stats: StoreStats::default(),
        }
    }

    /// Create and initialize a store in one step
    pub fn open(config: Config) -> Result<Self> {
        let mut store = Self::new(config);
        store.initialize()?;
        Ok(store)
    }

    /// Open a store over an already-created, empty I/O backend
    ///
    /// No file is created and `config.path` is informational only.
    pub fn with_io(config: Config, clock: Box<dyn Clock>, io: Box<dyn LogIo>) -> Result<Self> {
        let size = io.size()?;
        if size != 0 {
            return Err(LogKvError::IllegalState(format!(
                "log backend must start empty, found {size} bytes"
            )));
        }

        let mut store = Self::with_clock(config, clock);
        store.state = StoreState::Open(OpenLog::new(io));
        Ok(store)
    }

    /// Create the log file and move the store to the open state
    ///
    /// Fails with `FileExists` if anything already sits at the configured
    /// path: the store never appends to or replays an existing file.
    pub fn initialize(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(LogKvError::IllegalState(
                "store is already initialized".to_string(),
            ));
        }

        let path = self.config.path.as_path();
        if file_exists(path)? {
            return Err(LogKvError::FileExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = files::create_exclusive(path)?;
        self.state = StoreState::Open(OpenLog::new(Box::new(FileIo::new(file))));

        info!(path = %path.display(), "log store initialized");
        Ok(())
    }

    /// Store a value, durably, before indexing it
    ///
    /// Steps:
    /// 1. Encode the record with the current timestamp
    /// 2. Append it at the write position
    /// 3. Sync the file
    /// 4. Point the key directory at the new value
    /// 5. Advance the write position
    ///
    /// If step 2 or 3 fails the key directory and write position are left
    /// untouched and the file is cut back to the write position.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let log = self.state.open_mut("set")?;

        let timestamp = self.clock.now_secs();
        let encoded = encode_record(timestamp, key, value)?;
        let entry = log.entry_for(timestamp, &encoded)?;

        if let Err(e) = log.append(&encoded.record).and_then(|_| log.sync()) {
            warn!(key, offset = log.write_position, error = %e, "append failed");
            log.discard_tail();
            return Err(e);
        }

        self.key_dir.insert(key, entry);
        log.advance(encoded.len());

        self.stats.records_appended += 1;
        self.stats.bytes_appended += encoded.len() as u64;
        self.stats.syncs += 1;

        debug!(
            key,
            value_offset = entry.value_offset,
            value_size = entry.value_size,
            write_position = log.write_position,
            "record appended"
        );
        Ok(())
    }

    /// Get a key's current value
    ///
    /// Returns `Ok(None)` for a key that was never set. Only the value's byte
    /// range is read; the record header is not consulted.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let log = self.state.open("get")?;

        let Some(entry) = self.key_dir.get(key) else {
            return Ok(None);
        };

        let mut buf = vec![0u8; entry.value_size as usize];
        log.io
            .read_at(&mut buf, u64::from(entry.value_offset))
            .map_err(LogKvError::Read)?;

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Sync the log file and release it
    pub fn close(self) -> Result<()> {
        if let StoreState::Open(log) = &self.state {
            log.sync()?;
            info!(
                path = %self.config.path.display(),
                write_position = log.write_position,
                keys = self.key_dir.len(),
                "log store closed"
            );
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Whether `initialize` has completed
    pub fn is_open(&self) -> bool {
        matches!(self.state, StoreState::Open(_))
    }

    /// Offset the next record will be written at, if open
    pub fn write_position(&self) -> Option<u64> {
        match &self.state {
            StoreState::Open(log) => Some(log.write_position),
            StoreState::Uninitialized => None,
        }
    }

    /// Current key directory entry for a key
    pub fn key_dir_entry(&self, key: &str) -> Option<KeyDirEntry> {
        self.key_dir.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key_dir.contains_key(key)
    }

    /// Number of distinct indexed keys
    pub fn key_count(&self) -> usize {
        self.key_dir.len()
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }
}
