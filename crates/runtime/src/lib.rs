//! Runtime services for the tap game backend.
//!
//! This crate wires the player store, the gameplay facade, and the worker
//! task into a cohesive API. Presentation layers (chat bot handlers, the web
//! client bridge) embed [`Runtime`] and talk to it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`repository`] provides the player stores
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    Action, ActionRequest, ActionResponse, GameplayError, GameplayFacade, Leaderboard, NameChange,
    PlayerState, PlayerStats, RejectReason, Result, RuntimeHandle, TapOutcome,
};
pub use repository::{FilePlayerStore, InMemoryPlayerStore, PlayerStore, RepositoryError};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
