//! Pure player model and ranking rules for the tap game.
//!
//! `tap-core` defines the canonical record type, the reward rule, display name
//! validation, and the ranking policies. It performs no I/O; the runtime crate
//! wraps it with storage and request handling.
pub mod config;
pub mod error;
pub mod ranking;
pub mod state;

pub use config::GameConfig;
pub use error::NameError;
pub use ranking::{Aggregate, Rank, RankedPlayer};
pub use state::{DisplayName, PlayerId, PlayerRecord, TapReward};
