//! Public gameplay API surface.
//!
//! This module gathers the types exposed to presentation layers so the
//! repository and worker modules can stay focused on storage and sequencing.

pub mod actions;
pub mod errors;
pub mod facade;
pub mod handle;

pub use actions::{Action, ActionRequest, ActionResponse};
pub use errors::{GameplayError, Result};
pub use facade::{
    GameplayFacade, Leaderboard, NameChange, PlayerState, PlayerStats, RejectReason, TapOutcome,
};
pub use handle::RuntimeHandle;
