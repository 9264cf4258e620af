//! Error types for hashdbm
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DbmError
pub type Result<T> = std::result::Result<T, DbmError>;

/// Unified error type for hashdbm operations
#[derive(Debug, Error)]
pub enum DbmError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Page Errors
    // -------------------------------------------------------------------------
    /// The pair can never fit in a page, however empty.
    #[error("Pair too large: needs {need} bytes, at most {max} allowed")]
    CapacityExceeded { need: usize, max: usize },

    /// The pair does not fit in the remaining free space of this page.
    #[error("Page full: pair needs {need} bytes, {free} free")]
    PageFull { need: usize, free: usize },

    #[error("Corrupt page {page}: structural validation failed")]
    CorruptPage { page: u64 },

    // -------------------------------------------------------------------------
    // Directory Errors
    // -------------------------------------------------------------------------
    #[error("Cannot insert after {attempts} page splits")]
    SplitLimitExceeded { attempts: usize },

    // -------------------------------------------------------------------------
    // Handle Errors
    // -------------------------------------------------------------------------
    #[error("Database is opened read-only")]
    ReadOnly,

    #[error("Configuration error: {0}")]
    Config(String),

    /// A page write was requested with no page loaded in the buffer.
    #[error("No page in the buffer to write")]
    NoPageBuffered,
}

impl DbmError {
    /// Whether this error raises the handle's sticky error flag.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            DbmError::Io(_)
                | DbmError::CorruptPage { .. }
                | DbmError::SplitLimitExceeded { .. }
                | DbmError::NoPageBuffered
        )
    }
}
