//! Tests for LogStore behaviour when I/O fails
//!
//! These tests verify:
//! - A failed append or sync leaves the index and write position unchanged
//! - Later writes still land at correct offsets
//! - Read failures surface as `Read`
//! - A failed batch keeps earlier committed chunks

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use logkv::fio::LogIo;
use logkv::{Config, ErrorKind, FixedClock, LogStore};

// =============================================================================
// Helper Functions
// =============================================================================

/// In-memory log with switchable failures
#[derive(Default)]
struct FlakyIo {
    data: Mutex<Vec<u8>>,
    /// Writes allowed before failing; u64::MAX means never fail
    writes_left: AtomicU64,
    fail_sync: AtomicBool,
    fail_read: AtomicBool,
}

impl FlakyIo {
    fn new() -> Arc<Self> {
        let io = Self::default();
        io.writes_left.store(u64::MAX, Ordering::SeqCst);
        Arc::new(io)
    }

    fn fail_after_writes(&self, n: u64) {
        self.writes_left.store(n, Ordering::SeqCst);
    }

    fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

/// Lets the test keep a handle on the backend it hands to the store
struct SharedIo(Arc<FlakyIo>);

impl LogIo for SharedIo {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        let io = &self.0;
        let mut data = io.data.lock().unwrap();
        let offset = offset as usize;

        let allowed = io
            .writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                u64::MAX => Some(n),
                0 => None,
                n => Some(n - 1),
            })
            .is_ok();

        // A failing write still leaves half its bytes behind
        let written = if allowed { buf.len() } else { buf.len() / 2 };
        if data.len() < offset + written {
            data.resize(offset + written, 0);
        }
        data[offset..offset + written].copy_from_slice(&buf[..written]);

        if allowed {
            Ok(())
        } else {
            Err(io::Error::other("injected write failure"))
        }
    }

    fn sync(&self) -> io::Result<()> {
        if self.0.fail_sync.load(Ordering::SeqCst) {
            return Err(io::Error::other("injected sync failure"));
        }
        Ok(())
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        if self.0.fail_read.load(Ordering::SeqCst) {
            return Err(io::Error::other("injected read failure"));
        }
        let data = self.0.data.lock().unwrap();
        let start = offset as usize;
        let end = start + buf.len();
        if end > data.len() {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        buf.copy_from_slice(&data[start..end]);
        Ok(())
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.0.len() as u64)
    }

    fn truncate(&self, len: u64) -> io::Result<()> {
        self.0.data.lock().unwrap().truncate(len as usize);
        Ok(())
    }
}

fn setup_flaky_store(batch_sync_bytes: usize) -> (Arc<FlakyIo>, LogStore) {
    let io = FlakyIo::new();
    let config = Config::builder()
        .path("flaky.db")
        .batch_sync_bytes(batch_sync_bytes)
        .build();
    let store = LogStore::with_io(
        config,
        Box::new(FixedClock::new(42)),
        Box::new(SharedIo(Arc::clone(&io))),
    )
    .unwrap();
    (io, store)
}

// =============================================================================
// Single Write Failure Tests
// =============================================================================

#[test]
fn test_failed_append_leaves_state_unchanged() {
    let (io, mut store) = setup_flaky_store(100_000);
    store.set("kept", "value").unwrap();
    let position = store.write_position();

    io.fail_after_writes(0);
    let err = store.set("lost", "never indexed").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Write);
    assert_eq!(store.write_position(), position);
    assert!(!store.contains_key("lost"));
    assert_eq!(store.get("kept").unwrap().as_deref(), Some("value"));
    // Partial bytes are cut off
    assert_eq!(Some(io.len() as u64), position);
}

#[test]
fn test_write_after_failed_append_lands_at_write_position() {
    let (io, mut store) = setup_flaky_store(100_000);
    store.set("a", "1").unwrap();

    io.fail_after_writes(0);
    store.set("b", "a much longer value that fails").unwrap_err();
    assert_eq!(io.len(), 14);

    io.fail_after_writes(u64::MAX);
    store.set("c", "3").unwrap();

    // "a" record is 14 bytes, so "c" starts right after it
    assert_eq!(store.key_dir_entry("c").unwrap().value_offset, 14 + 13);
    assert_eq!(store.get("c").unwrap().as_deref(), Some("3"));
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.write_position(), Some(28));
    assert_eq!(io.len(), 28);
}

#[test]
fn test_failed_sync_is_write_error() {
    let (io, mut store) = setup_flaky_store(100_000);
    store.set("kept", "value").unwrap();
    let position = store.write_position();

    io.fail_sync.store(true, Ordering::SeqCst);
    let err = store.set("lost", "v").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Write);
    assert_eq!(store.write_position(), position);
    assert!(!store.contains_key("lost"));
    assert_eq!(store.stats().syncs, 1);
    // The unsynced record is cut off
    assert_eq!(Some(io.len() as u64), position);
}

#[test]
fn test_failed_overwrite_keeps_old_value() {
    let (io, mut store) = setup_flaky_store(100_000);
    store.set("k", "old").unwrap();

    io.fail_after_writes(0);
    store.set("k", "new").unwrap_err();

    assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
}

// =============================================================================
// Read Failure Tests
// =============================================================================

#[test]
fn test_failed_read_is_read_error() {
    let (io, mut store) = setup_flaky_store(100_000);
    store.set("k", "v").unwrap();

    io.fail_read.store(true, Ordering::SeqCst);

    assert_eq!(store.get("k").unwrap_err().kind(), ErrorKind::Read);
    // Absent keys never touch the backend
    assert_eq!(store.get("absent").unwrap(), None);
}

// =============================================================================
// Batch Failure Tests
// =============================================================================

#[test]
fn test_failed_batch_keeps_committed_chunks() {
    // Records are 20 bytes; threshold 30 commits after every 2nd record
    let (io, mut store) = setup_flaky_store(30);
    let pairs: Vec<(String, String)> = (0..5)
        .map(|i| (format!("key{}", i), format!("val{}", i)))
        .collect();

    // Fifth append fails
    io.fail_after_writes(4);
    let err = store.set_many(pairs).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Write);
    for key in ["key0", "key1", "key2", "key3"] {
        assert!(store.contains_key(key), "{key} should be committed");
    }
    assert!(!store.contains_key("key4"));
    assert_eq!(store.write_position(), Some(80));
    assert_eq!(io.len(), 80);
    assert_eq!(store.get("key3").unwrap().as_deref(), Some("val3"));
}

#[test]
fn test_failed_batch_sync_leaves_chunk_unindexed() {
    let (io, mut store) = setup_flaky_store(100_000);
    store.set("before", "ok").unwrap();
    let before = store.write_position().unwrap();

    io.fail_sync.store(true, Ordering::SeqCst);
    let err = store.set_many(vec![("x", "1"), ("y", "2")]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Write);
    assert!(!store.contains_key("x"));
    assert!(!store.contains_key("y"));
    // The records were appended, just never committed
    assert_eq!(store.write_position(), Some(before + 2 * 14));
    assert_eq!(io.len() as u64, before + 2 * 14);
    assert_eq!(store.get("before").unwrap().as_deref(), Some("ok"));
}

// =============================================================================
// Backend Tests
// =============================================================================

#[test]
fn test_with_io_requires_empty_backend() {
    let io = FlakyIo::new();
    io.data.lock().unwrap().extend_from_slice(b"junk");

    let result = LogStore::with_io(
        Config::default(),
        Box::new(FixedClock::new(1)),
        Box::new(SharedIo(io)),
    );

    assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::IllegalState));
}

#[test]
fn test_with_io_store_is_open() {
    let (_io, store) = setup_flaky_store(100_000);

    assert!(store.is_open());
    assert_eq!(store.write_position(), Some(0));
}

#[test]
fn test_store_debug_shows_state() {
    let (_io, mut store) = setup_flaky_store(100_000);
    store.set("a", "1").unwrap();

    let shown = format!("{:?}", store);

    assert!(shown.starts_with("LogStore"));
    assert!(shown.contains("write_position: Some(14)"));
    assert!(shown.contains("keys: 1"));
}
