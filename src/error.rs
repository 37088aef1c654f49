//! Unified error types for chatscrub.
//!
//! This module provides a single [`ScrubError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular crates
//! like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Only two conditions are fatal to a run: a malformed category dictionary
//! (nothing can be profiled without it) and I/O failures in the workspace
//! driver. Everything that can go wrong inside a single message is confined
//! to that message — see [`ScrubError::MalformedRecord`] and the routing rules
//! in [`crate::pipeline`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatscrub operations.
///
/// This type is broadly used across the library for any operation that
/// may produce an error.
///
/// # Example
///
/// ```rust
/// use chatscrub::error::Result;
/// use chatscrub::record::MessageRecord;
///
/// fn my_function() -> Result<Vec<MessageRecord>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScrubError>;

/// The error type for all chatscrub operations.
///
/// This enum represents all possible errors that can occur when using
/// chatscrub. Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScrubError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The workspace directory doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// This can occur when reading a per-day message file or writing output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading error while loading the category dictionary.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The category dictionary source is malformed.
    ///
    /// This is fatal to startup: no message can be profiled without the
    /// dictionary. It occurs when:
    /// - The header row is missing or empty
    /// - The file cannot be read as tabular data
    #[error("Invalid category dictionary{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    DictionaryFormat {
        /// Description of what's wrong
        message: String,
        /// The dictionary file path, if available
        path: Option<PathBuf>,
    },

    /// A message record has an incompatible internal shape.
    ///
    /// Raised when a record passed the eligibility check but its rich-content
    /// structure cannot be interpreted (e.g. `blocks` is not an array of
    /// objects). Callers catch this at the message boundary and route the
    /// record to the not-processed collection instead of aborting the channel.
    #[error("Malformed record {id}: {message}")]
    MalformedRecord {
        /// The record's client message id (or a placeholder)
        id: String,
        /// Description of the incompatible shape
        message: String,
    },

    /// A per-day input file did not contain an array of message records.
    #[error("Expected a JSON array of messages in {}", path.display())]
    NotAMessageArray {
        /// The offending file
        path: PathBuf,
    },

    /// A channel worker thread panicked or disconnected before reporting.
    #[error("Channel worker failed for '{channel}'")]
    WorkerFailed {
        /// Channel whose result never arrived
        channel: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ScrubError {
    /// Creates a dictionary format error.
    pub fn dictionary_format(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ScrubError::DictionaryFormat {
            message: message.into(),
            path,
        }
    }

    /// Creates a malformed record error.
    pub fn malformed_record(id: impl Into<String>, message: impl Into<String>) -> Self {
        ScrubError::MalformedRecord {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a not-a-message-array error.
    pub fn not_a_message_array(path: impl Into<PathBuf>) -> Self {
        ScrubError::NotAMessageArray { path: path.into() }
    }

    /// Creates a worker failure error.
    pub fn worker_failed(channel: impl Into<String>) -> Self {
        ScrubError::WorkerFailed {
            channel: channel.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ScrubError::Io(_))
    }

    /// Returns `true` if this is a dictionary format error.
    pub fn is_dictionary_format(&self) -> bool {
        matches!(self, ScrubError::DictionaryFormat { .. })
    }

    /// Returns `true` if this is a malformed record error.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, ScrubError::MalformedRecord { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
