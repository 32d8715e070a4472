//! Error types for the casebook core library.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for case model and store operations.
#[derive(Error, Debug)]
pub enum CaseError {
    /// A case file exists but does not decode as the expected document.
    #[error("Corrupt case file {}: {reason}", path.display())]
    CorruptCase {
        /// Offending file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CaseError>;
