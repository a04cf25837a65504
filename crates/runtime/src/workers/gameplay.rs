//! Gameplay worker that owns the [`GameplayFacade`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle) and runs
//! them strictly one at a time, which gives every player record (and the
//! display name table) a single sequential mutation path.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use tap_core::PlayerId;

use crate::api::{
    ActionRequest, ActionResponse, GameplayFacade, Leaderboard, NameChange, PlayerState,
    PlayerStats, Result, TapOutcome,
};

/// Commands that can be sent to the gameplay worker
pub enum Command {
    Tap {
        id: PlayerId,
        reply: oneshot::Sender<Result<TapOutcome>>,
    },
    State {
        id: PlayerId,
        reply: oneshot::Sender<Result<PlayerState>>,
    },
    Rename {
        id: PlayerId,
        name: String,
        reply: oneshot::Sender<Result<NameChange>>,
    },
    Leaderboard {
        id: PlayerId,
        limit: usize,
        reply: oneshot::Sender<Result<Leaderboard>>,
    },
    StartSession {
        id: PlayerId,
        handle: Option<String>,
        reply: oneshot::Sender<Result<PlayerState>>,
    },
    Stats {
        id: PlayerId,
        reply: oneshot::Sender<Result<PlayerStats>>,
    },
    /// Raw web client action.
    Dispatch {
        request: ActionRequest,
        reply: oneshot::Sender<Result<ActionResponse>>,
    },
}

/// Background task that processes gameplay commands.
pub struct GameplayWorker {
    facade: GameplayFacade,
    command_rx: mpsc::Receiver<Command>,
}

impl GameplayWorker {
    pub fn new(facade: GameplayFacade, command_rx: mpsc::Receiver<Command>) -> Self {
        Self { facade, command_rx }
    }

    /// Main worker loop.
    ///
    /// Store calls are synchronous, so the loop runs on a blocking thread and
    /// exits once every handle has been dropped.
    pub fn run(mut self) {
        while let Some(cmd) = self.command_rx.blocking_recv() {
            self.handle_command(cmd);
        }
        debug!("gameplay worker stopped");
    }

    fn handle_command(&self, cmd: Command) {
        let delivered = match cmd {
            Command::Tap { id, reply } => reply.send(self.facade.handle_tap(id)).is_ok(),
            Command::State { id, reply } => reply.send(self.facade.get_state(id)).is_ok(),
            Command::Rename { id, name, reply } => reply
                .send(self.facade.request_name_change(id, &name))
                .is_ok(),
            Command::Leaderboard { id, limit, reply } => reply
                .send(self.facade.get_leaderboard(id, limit))
                .is_ok(),
            Command::StartSession { id, handle, reply } => reply
                .send(self.facade.start_session(id, handle.as_deref()))
                .is_ok(),
            Command::Stats { id, reply } => reply.send(self.facade.get_stats(id)).is_ok(),
            Command::Dispatch { request, reply } => {
                reply.send(Ok(self.facade.dispatch(request))).is_ok()
            }
        };

        // The caller gave up (usually a timeout); the work itself is committed.
        if !delivered {
            warn!("gameplay reply dropped: requester went away");
        }
    }
}
