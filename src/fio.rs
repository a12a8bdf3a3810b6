//! File I/O backend
//!
//! The store talks to its log file only through [`LogIo`], so alternative
//! backends (and fault-injecting ones in tests) can stand in for a real file.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use parking_lot::Mutex;

/// Positional I/O over a single log file
pub trait LogIo: Send + Sync {
    /// Write all of `buf` starting at `offset`
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()>;

    /// Force written data to stable storage
    fn sync(&self) -> io::Result<()>;

    /// Fill `buf` completely from `offset`
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()>;

    /// Current length of the underlying file
    fn size(&self) -> io::Result<u64>;

    /// Shrink the file to `len` bytes, dropping anything past it
    fn truncate(&self, len: u64) -> io::Result<()>;
}

/// Standard file backend
///
/// The cursor is shared between reads and writes, so each seek and the
/// transfer that follows it happen under one lock.
pub struct FileIo {
    file: Mutex<File>,
}

impl FileIo {
    pub fn new(file: File) -> Self {
        Self {
            file: Mutex::new(file),
        }
    }
}

impl LogIo for FileIo {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)?;
        file.flush()
    }

    fn sync(&self) -> io::Result<()> {
        self.file.lock().sync_all()
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.file.lock().metadata()?.len())
    }

    fn truncate(&self, len: u64) -> io::Result<()> {
        self.file.lock().set_len(len)
    }
}
