//! Key Directory Module
//!
//! In-memory index from each key to the location of its current value.
//!
//! ## Responsibilities
//! - Map key → latest key directory entry (last write wins, no history)
//! - Hold entries in their encoded 12-byte form
//! - Apply deferred batches of entries after a sync
//!
//! ## Lifetime
//! The directory is never persisted and never rebuilt from the log. It lives
//! exactly as long as the store that owns it.

mod table;

pub use table::KeyDir;
