//! Error types for syncstate
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in syncstate
#[derive(Debug, Error)]
pub enum SyncstateError {
    /// Task status string outside the closed vocabulary.
    ///
    /// The status vocabulary is closed; encountering anything else while
    /// materializing a task is a data-integrity violation and aborts the read.
    #[error("Unknown task status: {0}")]
    UnknownTaskStatus(String),

    /// Result status string outside the closed vocabulary.
    #[error("Unknown result status: {0}")]
    UnknownResultStatus(String),

    /// Task not found in the store
    #[error("Task not found: {0}")]
    TaskNotFound(i32),

    /// Topology collaborator error
    #[error("Topology error: {0}")]
    Topology(String),

    /// SQLite storage error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for syncstate operations
pub type Result<T> = std::result::Result<T, SyncstateError>;
