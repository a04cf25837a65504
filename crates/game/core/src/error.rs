//! Validation errors raised by the pure player model.
//!
//! Storage failures live in the runtime crate; everything here is caused by
//! bad input and should be reported back to the player rather than retried.

use thiserror::Error;

/// Reasons a proposed display name is refused before it reaches a store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("display name must be {min}-{max} characters, got {len}")]
    InvalidLength { len: usize, min: usize, max: usize },
}
