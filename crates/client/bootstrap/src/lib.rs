//! Shared bootstrap utilities for front-ends.
//!
//! Provides configuration loading and store/runtime setup that can be reused
//! by the stdio bridge, a chat bot process, or tests.
pub mod builder;
pub mod config;

pub use builder::{RuntimeBuilder, RuntimeSetup};
pub use config::{AppConfig, StoreKind};
