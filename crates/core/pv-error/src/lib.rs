//! Error types and classification for partview.
//!
//! This crate provides:
//! - [`PvError`] - Top-level error enum for grammar, query, discovery and storage errors
//! - [`ErrorCategory`] for reporting whether a failure is an input problem,
//!   a storage problem, or a broken internal invariant

use thiserror::Error;

/// Top-level error type for partview.
///
/// Any error raised during discovery aborts the whole enumeration; there is no
/// partial-result mode.
#[derive(Error, Debug)]
pub enum PvError {
    /// A path segment does not conform to the grammar syntax
    #[error("Malformed segment '{segment}': {reason}")]
    MalformedSegment { segment: String, reason: String },

    /// The same column was bound twice along one path
    #[error("Duplicate column '{column}' while expanding partition '{path}'")]
    DuplicateColumn { column: String, path: String },

    /// Grammar generation or descent was invoked past the terminal level
    #[error("Grammar exhausted: {0}")]
    GrammarExhausted(String),

    /// A column range was constructed with min > max
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// The storage backend reported a missing path
    #[error("Storage path not found: {0}")]
    StorageNotFound(String),

    /// Any other storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PvError {
    /// Build a [`PvError::MalformedSegment`].
    pub fn malformed(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSegment {
            segment: segment.into(),
            reason: reason.into(),
        }
    }
}

/// Error classification for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The grammar, query or directory tree supplied by the caller is inconsistent
    ///
    /// Examples: malformed segment, duplicate column, invalid range
    Input,

    /// The storage backend failed or a path vanished
    Storage,

    /// An internal invariant was violated; never recovered
    Fatal,
}

/// Classifies an error for reporting.
pub fn classify_error(error: &PvError) -> ErrorCategory {
    match error {
        PvError::MalformedSegment { .. } => ErrorCategory::Input,
        PvError::DuplicateColumn { .. } => ErrorCategory::Input,
        PvError::InvalidRange(_) => ErrorCategory::Input,
        PvError::Config(_) => ErrorCategory::Input,
        PvError::StorageNotFound(_) => ErrorCategory::Storage,
        PvError::Storage(_) => ErrorCategory::Storage,
        PvError::GrammarExhausted(_) => ErrorCategory::Fatal,
        PvError::Other(_) => ErrorCategory::Fatal,
    }
}

/// Result type alias using PvError.
pub type Result<T> = std::result::Result<T, PvError>;
