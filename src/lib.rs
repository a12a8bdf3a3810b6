//! # logkv
//!
//! A minimal log-structured key-value store:
//! - Values are appended as fixed-header records to one append-only file
//! - An in-memory key directory maps each key to its latest value's offset
//! - Every `set` is synced before it is indexed
//! - `set_many` amortizes syncs over chunks of appended bytes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          LogStore                           │
//! │               (set / set_many / get, &mut writer)           │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ encode                       │ index
//!                ▼                              ▼
//!         ┌─────────────┐                ┌─────────────┐
//!         │   format    │                │   KeyDir    │
//!         │ (12B header)│                │ (HashMap)   │
//!         └──────┬──────┘                └─────────────┘
//!                │ append / read_at
//!                ▼
//!         ┌─────────────┐
//!         │    LogIo    │
//!         │ (one file)  │
//!         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use logkv::{Config, LogStore};
//!
//! let config = Config::builder().path("/tmp/logkv-demo.db").build();
//! let mut store = LogStore::open(config)?;
//!
//! store.set("found", "yes")?;
//! assert_eq!(store.get("found")?, Some("yes".to_string()));
//! assert_eq!(store.get("not found")?, None);
//! # Ok::<(), logkv::LogKvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod clock;

pub mod format;
pub mod keydir;
pub mod fio;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, LogKvError, Result};
pub use config::Config;
pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{LogStore, StoreStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of logkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
