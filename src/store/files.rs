//! Filesystem helpers used when a store is initialized

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use crate::error::{LogKvError, Result};

/// Check whether a regular file exists at `path`
///
/// "Not found" is `Ok(false)`; any other failure to stat the path is an
/// error rather than a `false`.
pub fn file_exists(path: &Path) -> Result<bool> {
    match path.metadata() {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LogKvError::Io(e)),
    }
}

/// Create a new file for reading and writing, failing if anything is
/// already at `path`
pub fn create_exclusive(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => LogKvError::FileExists(path.to_path_buf()),
            _ => LogKvError::Io(e),
        })
}
