//! Tap game backend binary.
//!
//! Composition root that assembles the player store and runtime, then serves
//! web client actions as line-delimited JSON: one request object per line on
//! stdin, one response object per line on stdout. Logs go to stderr and a log
//! file so stdout stays a clean protocol channel.
//!
//! # Examples
//!
//! ```bash
//! echo '{"user_id": 1, "action": "tap"}' | TAPCOIN_STORE=memory cargo run -p client-cli
//! ```
mod bridge;
mod logging;

use anyhow::Result;
use client_bootstrap::{AppConfig, RuntimeBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = logging::setup_logging()?;

    let config = AppConfig::from_env()?;
    tracing::info!("Starting tapcoin backend");
    tracing::info!("Store: {:?}", config.store);
    tracing::info!("Request timeout: {:?}", config.request_timeout);

    let setup = RuntimeBuilder::new(config).build()?;
    let handle = setup.runtime.handle();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let served = bridge::serve(&handle, stdin, stdout).await?;

    tracing::info!("Input closed after {} requests, shutting down", served);
    drop(handle);
    setup.runtime.shutdown().await?;

    Ok(())
}
