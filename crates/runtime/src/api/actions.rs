//! JSON action payloads exchanged with the embedded web client.
//!
//! The client sends one object per request:
//!
//! ```json
//! { "user_id": 42, "action": "set_name_from_app", "name": "Alice" }
//! ```
//!
//! and receives a flat object whose `success` flag tells it whether the
//! remaining fields are a result or an `error` message.
use serde::{Deserialize, Serialize};
use tap_core::{PlayerId, RankedPlayer};
use tracing::{error, info};

use super::errors::GameplayError;
use super::facade::{GameplayFacade, NameChange, RejectReason};

pub const MSG_NAME_SET: &str = "Name set";
pub const MSG_NAME_TAKEN: &str = "Name taken";
pub const MSG_NAME_LENGTH: &str = "Name must be 2-20 characters";

/// A decoded client request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ActionRequest {
    pub user_id: PlayerId,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Tap,
    GetState,
    GetTop,
    SetNameFromApp {
        #[serde(default)]
        name: String,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::GetState => "get_state",
            Self::GetTop => "get_top",
            Self::SetNameFromApp { .. } => "set_name_from_app",
        }
    }
}

/// Response payload, serialized without a variant tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Tap {
        success: bool,
        coins: u64,
        total_taps: u64,
        coins_added: u64,
    },
    State {
        success: bool,
        coins: u64,
        total_taps: u64,
        display_name: String,
        has_name: bool,
    },
    Top {
        success: bool,
        top_players: Vec<RankedPlayer>,
    },
    Name {
        success: bool,
        message: String,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl ActionResponse {
    pub fn failure(error: impl ToString) -> Self {
        Self::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Tap { success, .. }
            | Self::State { success, .. }
            | Self::Top { success, .. }
            | Self::Name { success, .. }
            | Self::Failure { success, .. } => *success,
        }
    }

    /// Serialize to a single JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"failed to encode response: {e}"}}"#)
        })
    }
}

/// Decode a request, or produce the failure response the client should see.
pub fn parse_request(json: &str) -> Result<ActionRequest, ActionResponse> {
    serde_json::from_str(json).map_err(|e| ActionResponse::failure(format!("bad request: {e}")))
}

impl GameplayFacade {
    /// Run one client action. Never fails: errors become a failure payload so
    /// one broken request cannot affect the others.
    pub fn dispatch(&self, request: ActionRequest) -> ActionResponse {
        let ActionRequest { user_id, action } = request;
        info!(player = %user_id, action = action.name(), "web app request");

        match self.run_action(user_id, action) {
            Ok(response) => response,
            Err(err) => {
                error!(player = %user_id, "web app request failed: {}", err);
                ActionResponse::failure(err)
            }
        }
    }

    fn run_action(
        &self,
        id: PlayerId,
        action: Action,
    ) -> Result<ActionResponse, GameplayError> {
        let response = match action {
            Action::Tap => {
                let outcome = self.handle_tap(id)?;
                ActionResponse::Tap {
                    success: true,
                    coins: outcome.coins,
                    total_taps: outcome.total_taps,
                    coins_added: outcome.coins_added,
                }
            }
            Action::GetState => {
                let state = self.get_state(id)?;
                ActionResponse::State {
                    success: true,
                    coins: state.coins,
                    total_taps: state.total_taps,
                    display_name: state.display_name.unwrap_or_default(),
                    has_name: state.has_name,
                }
            }
            Action::GetTop => {
                let board = self.get_default_leaderboard(id)?;
                ActionResponse::Top {
                    success: true,
                    top_players: board.entries,
                }
            }
            Action::SetNameFromApp { name } => {
                let (success, message) = match self.request_name_change(id, &name)? {
                    NameChange::Accepted { .. } => (true, MSG_NAME_SET),
                    NameChange::Rejected(RejectReason::NameTaken) => (false, MSG_NAME_TAKEN),
                    NameChange::Rejected(RejectReason::InvalidLength(_)) => {
                        (false, MSG_NAME_LENGTH)
                    }
                };
                ActionResponse::Name {
                    success,
                    message: message.to_string(),
                }
            }
        };
        Ok(response)
    }
}
