//! Repository layer for player records.
//!
//! Repositories own the durable player table and the only write paths into
//! it. Rank and leaderboard queries are answered from consistent snapshots
//! through the pure functions in [`tap_core::ranking`].

mod error;
mod file;
mod memory;
mod table;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FilePlayerStore;
pub use memory::InMemoryPlayerStore;
pub use traits::PlayerStore;
