//! Cloneable façade for issuing gameplay requests to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and bounds every request with the
//! configured timeout, so a stuck store surfaces as an error instead of a
//! hung caller.
use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use tap_core::PlayerId;

use super::actions::{self, ActionResponse};
use super::errors::{GameplayError, Result};
use super::facade::{Leaderboard, NameChange, PlayerState, PlayerStats, TapOutcome};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    request_timeout: Duration,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, request_timeout: Duration) -> Self {
        Self {
            command_tx,
            request_timeout,
        }
    }

    /// Credit one tap to `id`.
    pub async fn tap(&self, id: PlayerId) -> Result<TapOutcome> {
        self.request(|reply| Command::Tap { id, reply }).await
    }

    /// Read the player's counters and name.
    pub async fn state(&self, id: PlayerId) -> Result<PlayerState> {
        self.request(|reply| Command::State { id, reply }).await
    }

    /// Ask to change the player's display name.
    pub async fn rename(&self, id: PlayerId, name: impl Into<String>) -> Result<NameChange> {
        let name = name.into();
        self.request(|reply| Command::Rename { id, name, reply }).await
    }

    /// Top `limit` players and the requester's standing.
    pub async fn leaderboard(&self, id: PlayerId, limit: usize) -> Result<Leaderboard> {
        self.request(|reply| Command::Leaderboard { id, limit, reply }).await
    }

    /// Register first contact and refresh the platform handle.
    pub async fn start_session(
        &self,
        id: PlayerId,
        handle: Option<String>,
    ) -> Result<PlayerState> {
        self.request(|reply| Command::StartSession { id, handle, reply }).await
    }

    /// Personal statistics.
    pub async fn stats(&self, id: PlayerId) -> Result<PlayerStats> {
        self.request(|reply| Command::Stats { id, reply }).await
    }

    /// Handle one raw JSON action from the web client and return the JSON
    /// response. Never fails; errors are encoded in the response.
    pub async fn dispatch(&self, json: &str) -> String {
        let request = match actions::parse_request(json) {
            Ok(request) => request,
            Err(response) => return response.to_json(),
        };

        match self
            .request(|reply| Command::Dispatch { request, reply })
            .await
        {
            Ok(response) => response.to_json(),
            Err(error) => {
                tracing::error!("web app request failed: {}", error);
                ActionResponse::failure(error).to_json()
            }
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let exchange = async {
            self.command_tx
                .send(command(reply_tx))
                .await
                .map_err(|_| GameplayError::CommandChannelClosed)?;

            reply_rx.await.map_err(GameplayError::ReplyChannelClosed)?
        };

        with_timeout(self.request_timeout, exchange).await
    }
}

async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(GameplayError::Timeout(limit)),
    }
}
