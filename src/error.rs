//! Error types for jotdb
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using JotError
pub type Result<T> = std::result::Result<T, JotError>;

/// Unified error type for jotdb operations
#[derive(Debug, Error)]
pub enum JotError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The journal could not be created or opened. The store cannot be built.
    #[error("failed to open journal {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Journal Errors
    // -------------------------------------------------------------------------
    /// An append or sync failed. The in-memory change it belonged to has
    /// already been applied and is not rolled back.
    #[error("journal write failed: {0}")]
    JournalWrite(String),

    #[error("malformed journal entry at line {line}: {reason}")]
    MalformedEntry { line: u64, reason: String },

    #[error("compaction failed: {0}")]
    Compaction(String),

    // -------------------------------------------------------------------------
    // Identifier Errors
    // -------------------------------------------------------------------------
    /// Every identifier up to `u64::MAX` has been assigned or observed.
    #[error("record identifiers exhausted")]
    IdsExhausted,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JotError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn journal_write(err: std::io::Error) -> Self {
        Self::JournalWrite(err.to_string())
    }

    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            line,
            reason: reason.into(),
        }
    }
}
