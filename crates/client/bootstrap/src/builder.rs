//! Builds the player store and runtime used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use tap_runtime::{FilePlayerStore, InMemoryPlayerStore, PlayerStore, Runtime};

use crate::config::{AppConfig, StoreKind};

/// Builder that assembles the store and runtime for clients.
pub struct RuntimeBuilder {
    config: AppConfig,
    store: Option<Arc<dyn PlayerStore>>,
}

impl RuntimeBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: None,
        }
    }

    /// Provide a ready-made store instead of the one selected by config.
    pub fn store(mut self, store: Arc<dyn PlayerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Open the store and start the runtime. Must run inside a Tokio runtime.
    pub fn build(self) -> Result<RuntimeSetup> {
        let store = match self.store {
            Some(store) => store,
            None => open_store(&self.config)?,
        };

        let runtime = Runtime::builder()
            .config(self.config.runtime_config())
            .store(store)
            .build()?;

        Ok(RuntimeSetup {
            config: self.config,
            runtime,
        })
    }
}

fn open_store(config: &AppConfig) -> Result<Arc<dyn PlayerStore>> {
    match config.store {
        StoreKind::Memory => {
            tracing::info!("Using in-memory player store");
            Ok(Arc::new(InMemoryPlayerStore::new()))
        }
        StoreKind::File => {
            let dir = config.resolve_data_dir();
            let store = FilePlayerStore::open(&dir)
                .with_context(|| format!("failed to open player store in {}", dir.display()))?;
            tracing::info!("Using file player store at {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}

pub struct RuntimeSetup {
    pub config: AppConfig,
    pub runtime: Runtime,
}

#[cfg(test)]
mod tests {
    use tap_core::PlayerId;

    use super::*;

    #[tokio::test]
    async fn builds_file_backed_runtime() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: Some(temp.path().to_path_buf()),
            ..AppConfig::default()
        };

        let setup = RuntimeBuilder::new(config).build().unwrap();
        let handle = setup.runtime.handle();
        handle.tap(PlayerId(1)).await.unwrap();

        assert!(temp.path().join("players.json").exists());
    }

    #[tokio::test]
    async fn builds_memory_runtime() {
        let config = AppConfig {
            store: StoreKind::Memory,
            ..AppConfig::default()
        };

        let setup = RuntimeBuilder::new(config).build().unwrap();
        let state = setup.runtime.handle().state(PlayerId(2)).await.unwrap();
        assert_eq!(state.coins, 0);
    }
}
