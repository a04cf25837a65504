//! Error types raised by repository implementations.

use tap_core::PlayerId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("player {0} not found")]
    NotFound(PlayerId),

    #[error("display name {name:?} is already taken")]
    NameTaken { name: String },

    #[error("player {0} already exists")]
    DuplicateKey(PlayerId),

    #[error("player store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl RepositoryError {
    /// True for failures of the storage layer itself, as opposed to rejected
    /// requests.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::LockPoisoned | Self::Io(_) | Self::Json(_) | Self::CorruptedData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
