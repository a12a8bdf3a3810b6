//! Error types for logkv
//!
//! Provides a unified error type for all operations, plus a closed
//! [`ErrorKind`] tag so callers can branch on the failure without looking
//! at message text.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using LogKvError
pub type Result<T> = std::result::Result<T, LogKvError>;

/// Unified error type for logkv operations
#[derive(Debug, Error)]
pub enum LogKvError {
    // -------------------------------------------------------------------------
    // Setup Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log file already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error("Illegal store state: {0}")]
    IllegalState(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Cannot encode {field}: {value} does not fit in 32 bits")]
    Encoding { field: &'static str, value: u64 },

    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Data Path Errors
    // -------------------------------------------------------------------------
    #[error("Write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("Read failed: {0}")]
    Read(#[source] std::io::Error),
}

/// Tag identifying which kind of failure a [`LogKvError`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    FileExists,
    IllegalState,
    Encoding,
    TruncatedInput,
    Write,
    Read,
}

impl LogKvError {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogKvError::Io(_) => ErrorKind::Io,
            LogKvError::FileExists(_) => ErrorKind::FileExists,
            LogKvError::IllegalState(_) => ErrorKind::IllegalState,
            LogKvError::Encoding { .. } => ErrorKind::Encoding,
            LogKvError::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            LogKvError::Write(_) => ErrorKind::Write,
            LogKvError::Read(_) => ErrorKind::Read,
        }
    }
}
