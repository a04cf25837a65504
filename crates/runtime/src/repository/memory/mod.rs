//! In-memory repository implementations for testing and development.

mod player;

pub use player::InMemoryPlayerStore;
