//! Internal worker tasks used by the runtime orchestrator.

mod gameplay;

pub use gameplay::{Command, GameplayWorker};
