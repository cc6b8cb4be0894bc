//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening stores or stating indexes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store collection or artifact does not exist
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// Directory is not laid out as any known store level
    #[error("Not a store directory: {0}")]
    NotAStore(PathBuf),

    /// Malformed repository, version or unit identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// The listing producer stopped before finishing
    #[error("Listing aborted: {0}")]
    Aborted(String),
}

impl StoreError {
    /// Whether this error means "absent" rather than "broken".
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
