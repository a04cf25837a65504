//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Result, bail};
use tap_core::GameConfig;
use tap_runtime::RuntimeConfig;

/// Which player store backs the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// Volatile store, lost on exit.
    Memory,
    /// JSON table on disk.
    #[default]
    File,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            other => bail!("unknown store kind {other:?} (expected \"memory\" or \"file\")"),
        }
    }
}

/// Configuration required to bootstrap the backend.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreKind,
    /// Directory holding `players.json`. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub command_buffer: usize,
    pub leaderboard_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            store: StoreKind::default(),
            data_dir: None,
            request_timeout: runtime.request_timeout,
            command_buffer: runtime.command_buffer_size,
            leaderboard_size: runtime.game_config.leaderboard_size,
        }
    }
}

impl AppConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TAPCOIN_STORE` - `memory` or `file` (default: file)
    /// - `TAPCOIN_DATA_DIR` - Directory for the player table (default: platform-specific)
    /// - `TAPCOIN_REQUEST_TIMEOUT_MS` - Per-request storage timeout (default: 5000)
    /// - `TAPCOIN_COMMAND_BUFFER` - Pending request queue size (default: 64)
    /// - `TAPCOIN_LEADERBOARD_SIZE` - Entries returned by `get_top` (default: 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(kind) = lookup("TAPCOIN_STORE") {
            config.store = kind.parse()?;
        }

        config.data_dir = lookup("TAPCOIN_DATA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        if let Some(ms) = read::<u64>(&lookup, "TAPCOIN_REQUEST_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(ms.max(1));
        }

        if let Some(capacity) = read::<usize>(&lookup, "TAPCOIN_COMMAND_BUFFER") {
            config.command_buffer = capacity.max(1);
        }

        if let Some(size) = read::<usize>(&lookup, "TAPCOIN_LEADERBOARD_SIZE") {
            config.leaderboard_size = size;
        }

        Ok(config)
    }

    /// Data directory, falling back to the platform default.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "tapcoin")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"))
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            game_config: GameConfig::with_leaderboard_size(self.leaderboard_size),
            command_buffer_size: self.command_buffer,
            request_timeout: self.request_timeout,
            ..RuntimeConfig::default()
        }
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring invalid value {:?} for {}", raw, key);
            None
        }
    }
}
