//! High-level runtime orchestrator.
//!
//! The runtime owns the gameplay worker, wires up the command channel, and
//! exposes a builder-based API for presentation layers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tap_core::GameConfig;

use crate::api::{GameplayError, GameplayFacade, Result, RuntimeHandle};
use crate::repository::PlayerStore;
use crate::workers::{Command, GameplayWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub command_buffer_size: usize,
    /// Upper bound on how long a request may wait for the store.
    pub request_timeout: Duration,
    /// Upper bound on how long [`Runtime::shutdown`] waits for the worker.
    pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            command_buffer_size: 64,
            request_timeout: Duration::from_secs(5),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

/// Main runtime that serializes gameplay requests onto one worker.
///
/// Design: Runtime owns the worker.
/// [`RuntimeHandle`] provides a cloneable façade for request handlers.
pub struct Runtime {
    handle: RuntimeHandle,
    facade: GameplayFacade,
    worker_handle: JoinHandle<()>,
    shutdown_timeout: Duration,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across request handlers and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// The facade the worker runs requests against.
    pub fn facade(&self) -> &GameplayFacade {
        &self.facade
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits until every outstanding handle clone has been dropped and the
    /// worker has drained its queue, for at most the configured shutdown
    /// timeout. On expiry the worker is left to finish in the background.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        match tokio::time::timeout(self.shutdown_timeout, self.worker_handle).await {
            Ok(joined) => joined.map_err(GameplayError::WorkerJoin)?,
            Err(_) => {
                tracing::warn!(
                    "Gameplay worker still running after {:?}; handles outstanding",
                    self.shutdown_timeout
                );
                return Err(GameplayError::ShutdownTimeout(self.shutdown_timeout));
            }
        }

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn PlayerStore>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required player store
    pub fn store(mut self, store: Arc<dyn PlayerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Override the shutdown timeout
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Build the runtime and start its worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let store = self.store.ok_or(GameplayError::MissingStore)?;
        let facade = GameplayFacade::new(store, self.config.game_config.clone());

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let handle = RuntimeHandle::new(command_tx, self.config.request_timeout);

        let worker = GameplayWorker::new(facade.clone(), command_rx);
        let worker_handle = tokio::task::spawn_blocking(move || worker.run());

        tracing::debug!(
            "Runtime started: buffer={}, timeout={:?}",
            self.config.command_buffer_size,
            self.config.request_timeout
        );

        Ok(Runtime {
            handle,
            facade,
            worker_handle,
            shutdown_timeout: self.config.shutdown_timeout,
        })
    }
}
