//! Core error types for srcstore.

use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Invalid config {path}: {message}")]
    Config { path: String, message: String },

    /// Store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] srcstore_store::StoreError),
}
