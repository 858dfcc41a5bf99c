//! Custom error types for journalscope.
//!
//! This module defines all error types used throughout the application.
//! All functions return `Result<T, JournalScopeError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for journalscope operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum JournalScopeError {
    /// A source extract could not be read at all (missing file, unreadable)
    #[error("Source {source_name} unavailable: {reason}")]
    SourceUnavailable {
        /// Source name (ABDC, ABS, ...)
        source_name: &'static str,
        /// What went wrong
        reason: String,
    },

    /// A source extract was readable but structurally broken
    /// (header sentinel not found, fewer than 2 data rows)
    #[error("Malformed {source_name} sheet: {reason}")]
    SheetFormat {
        /// Source name (ABDC, ABS, ...)
        source_name: &'static str,
        /// What went wrong
        reason: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `JournalScopeError`
pub type Result<T> = std::result::Result<T, JournalScopeError>;
