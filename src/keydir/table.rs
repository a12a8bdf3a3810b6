//! Key directory implementation
//!
//! HashMap-based directory storing encoded entries.

use std::collections::HashMap;

use crate::format::{KeyDirEntry, KEY_DIR_ENTRY_SIZE};

/// Maps each key to the encoded entry of its most recent value
#[derive(Debug, Default)]
pub struct KeyDir {
    entries: HashMap<String, [u8; KEY_DIR_ENTRY_SIZE]>,
}

impl KeyDir {
    /// Create a new empty KeyDir
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the current entry for a key
    pub fn get(&self, key: &str) -> Option<KeyDirEntry> {
        self.entries.get(key).map(KeyDirEntry::from_bytes)
    }

    /// Insert or replace the entry for a key
    pub fn insert(&mut self, key: impl Into<String>, entry: KeyDirEntry) {
        self.entries.insert(key.into(), entry.encode());
    }

    /// Apply a batch of pending entries in order
    ///
    /// A key appearing more than once ends up with its last entry.
    pub fn commit<I>(&mut self, pending: I)
    where
        I: IntoIterator<Item = (String, KeyDirEntry)>,
    {
        for (key, entry) in pending {
            self.insert(key, entry);
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all indexed keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
