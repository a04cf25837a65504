//! Unified error types surfaced by the gameplay API.
//!
//! Wraps failures from the worker channel and repositories so presentation
//! layers can turn any of them into a user-visible message.
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, GameplayError>;

#[derive(Debug, Error)]
pub enum GameplayError {
    #[error(transparent)]
    Storage(#[from] RepositoryError),

    #[error("storage request timed out after {0:?}")]
    Timeout(Duration),

    #[error("gameplay worker command channel closed")]
    CommandChannelClosed,

    #[error("gameplay worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("gameplay worker did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("gameplay worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a player store to be configured before building")]
    MissingStore,
}

impl GameplayError {
    /// True when the underlying store failed or did not answer in time.
    pub fn is_storage(&self) -> bool {
        match self {
            Self::Storage(error) => error.is_storage(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}
