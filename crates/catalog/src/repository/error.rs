//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("corpus repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl RepositoryError {
    /// True for errors caused by unreadable cache contents rather than I/O.
    pub fn is_corruption(&self) -> bool {
        matches!(self, RepositoryError::CorruptedData(_))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
