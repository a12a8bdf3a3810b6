//! Configuration for logkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Default number of appended bytes after which `set_many` syncs and commits
pub const DEFAULT_BATCH_SYNC_BYTES: usize = 100_000;

/// Main configuration for a logkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single append-only log file.
    /// Must not exist yet when the store is initialized.
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Batch Write Configuration
    // -------------------------------------------------------------------------
    /// `set_many` syncs the file and commits pending key directory entries
    /// once more than this many bytes have been appended since the last sync
    pub batch_sync_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./logkv.db"),
            batch_sync_bytes: DEFAULT_BATCH_SYNC_BYTES,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the batch sync threshold (in bytes)
    pub fn batch_sync_bytes(mut self, bytes: usize) -> Self {
        self.config.batch_sync_bytes = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
