//! The request surface presentation layers call into.
//!
//! [`GameplayFacade`] sequences store and ranking calls, validates player
//! input, and maps storage failures into [`GameplayError`]. It is synchronous;
//! async callers go through [`crate::RuntimeHandle`].
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tap_core::ranking::{self, Aggregate, Rank, RankedPlayer};
use tap_core::{DisplayName, GameConfig, NameError, PlayerId};
use tracing::{debug, warn};

use super::errors::Result;
use crate::repository::{PlayerStore, RepositoryError};

/// Totals after an accepted tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapOutcome {
    pub coins: u64,
    pub total_taps: u64,
    pub coins_added: u64,
}

/// What the client needs to render the game screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub coins: u64,
    pub total_taps: u64,
    pub display_name: Option<String>,
    pub has_name: bool,
}

/// Result of a rename request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameChange {
    Accepted { name: String },
    Rejected(RejectReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    InvalidLength(NameError),
    NameTaken,
}

/// Leaderboard view for one requesting player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<RankedPlayer>,
    pub requesting_player_rank: Rank,
    pub requesting_player_coins: u64,
    pub aggregate: Aggregate,
}

/// Personal statistics screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerStats {
    pub label: String,
    pub coins: u64,
    pub total_taps: u64,
    pub rank: Rank,
    pub created_at: DateTime<Utc>,
}

/// Entry point for every gameplay request.
#[derive(Clone)]
pub struct GameplayFacade {
    store: Arc<dyn PlayerStore>,
    config: GameConfig,
}

impl GameplayFacade {
    pub fn new(store: Arc<dyn PlayerStore>, config: GameConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PlayerStore> {
        &self.store
    }

    /// Credit one tap, creating the player on first contact.
    pub fn handle_tap(&self, id: PlayerId) -> Result<TapOutcome> {
        let mut coins_added = 0;
        let record = self.store.update(id, None, &mut |record| {
            coins_added = record.apply_tap(Utc::now()).coins_added;
        })?;

        debug!(player = %id, coins = record.coins(), "tap accepted");
        Ok(TapOutcome {
            coins: record.coins(),
            total_taps: record.total_taps(),
            coins_added,
        })
    }

    /// Current counters and name, creating the player on first contact.
    pub fn get_state(&self, id: PlayerId) -> Result<PlayerState> {
        let record = self.store.get_or_create(id, None)?;
        Ok(PlayerState {
            coins: record.coins(),
            total_taps: record.total_taps(),
            display_name: record.display_name().map(str::to_owned),
            has_name: record.has_name(),
        })
    }

    /// Validate and claim a display name.
    ///
    /// Invalid lengths and names held by other players come back as
    /// [`NameChange::Rejected`]; only storage failures are errors.
    pub fn request_name_change(&self, id: PlayerId, proposed: &str) -> Result<NameChange> {
        let name = match DisplayName::parse(proposed) {
            Ok(name) => name,
            Err(error) => {
                warn!(player = %id, %error, "rejected display name");
                return Ok(NameChange::Rejected(RejectReason::InvalidLength(error)));
            }
        };

        self.store.get_or_create(id, None)?;
        match self.store.set_display_name(id, &name) {
            Ok(_) => Ok(NameChange::Accepted {
                name: name.into_inner(),
            }),
            Err(RepositoryError::NameTaken { name }) => {
                warn!(player = %id, %name, "display name already taken");
                Ok(NameChange::Rejected(RejectReason::NameTaken))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Top `limit` players plus the requesting player's own standing.
    ///
    /// Does not create a record for the requester.
    pub fn get_leaderboard(&self, id: PlayerId, limit: usize) -> Result<Leaderboard> {
        let records = self.store.snapshot()?;
        let requesting_player_coins = records
            .iter()
            .find(|record| record.id() == id)
            .map_or(0, |record| record.coins());

        Ok(Leaderboard {
            entries: ranking::top_n(&records, limit),
            requesting_player_rank: ranking::rank_of(&records, id),
            requesting_player_coins,
            aggregate: ranking::aggregate(&records),
        })
    }

    /// Leaderboard with the configured default size.
    pub fn get_default_leaderboard(&self, id: PlayerId) -> Result<Leaderboard> {
        self.get_leaderboard(id, self.config.leaderboard_size)
    }

    /// First contact from the chat client: create the player if needed and
    /// refresh the platform handle when it changed.
    pub fn start_session(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerState> {
        let record = match handle.filter(|h| !h.is_empty()) {
            Some(handle) => {
                let mut changed = false;
                let record = self.store.update(id, Some(handle), &mut |record| {
                    changed = record.refresh_handle(handle, Utc::now());
                })?;
                if changed {
                    debug!(player = %id, handle, "handle refreshed");
                }
                record
            }
            None => self.store.get_or_create(id, None)?,
        };

        Ok(PlayerState {
            coins: record.coins(),
            total_taps: record.total_taps(),
            display_name: record.display_name().map(str::to_owned),
            has_name: record.has_name(),
        })
    }

    /// Statistics screen for one player.
    pub fn get_stats(&self, id: PlayerId) -> Result<PlayerStats> {
        let record = self.store.get_or_create(id, None)?;
        let rank = self.store.rank(id)?;
        Ok(PlayerStats {
            label: record.label(),
            coins: record.coins(),
            total_taps: record.total_taps(),
            rank,
            created_at: record.created_at(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryPlayerStore;

    fn facade() -> GameplayFacade {
        GameplayFacade::new(Arc::new(InMemoryPlayerStore::new()), GameConfig::default())
    }

    #[test]
    fn fresh_player_state_is_zero() {
        let facade = facade();
        let state = facade.get_state(PlayerId(10)).unwrap();
        assert_eq!(
            state,
            PlayerState {
                coins: 0,
                total_taps: 0,
                display_name: None,
                has_name: false,
            }
        );
    }

    #[test]
    fn sequential_taps_accumulate() {
        let facade = facade();
        let mut last = None;
        for _ in 0..25 {
            last = Some(facade.handle_tap(PlayerId(1)).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.coins, 25);
        assert_eq!(last.total_taps, 25);
        assert_eq!(last.coins_added, 1);
    }

    #[test]
    fn name_length_boundaries() {
        let facade = facade();
        let id = PlayerId(1);

        let too_long = "b".repeat(21);
        let longest = "c".repeat(20);

        for rejected in ["a", too_long.as_str()] {
            assert!(matches!(
                facade.request_name_change(id, rejected).unwrap(),
                NameChange::Rejected(RejectReason::InvalidLength(_))
            ));
        }
        for accepted in ["ab", longest.as_str()] {
            assert_eq!(
                facade.request_name_change(id, accepted).unwrap(),
                NameChange::Accepted {
                    name: accepted.to_string()
                }
            );
        }
    }

    #[test]
    fn taken_name_is_rejected_and_owner_keeps_it() {
        let facade = facade();
        let (a, b) = (PlayerId(1), PlayerId(2));

        facade.request_name_change(a, "Alice").unwrap();
        assert_eq!(
            facade.request_name_change(b, "Alice").unwrap(),
            NameChange::Rejected(RejectReason::NameTaken)
        );
        assert_eq!(
            facade.get_state(a).unwrap().display_name.as_deref(),
            Some("Alice")
        );
        assert!(!facade.get_state(b).unwrap().has_name);

        // Re-claiming one's own name is not blocked.
        assert!(matches!(
            facade.request_name_change(a, "Alice").unwrap(),
            NameChange::Accepted { .. }
        ));
    }

    #[test]
    fn name_is_trimmed_before_storing() {
        let facade = facade();
        assert_eq!(
            facade.request_name_change(PlayerId(4), "  Bob  ").unwrap(),
            NameChange::Accepted {
                name: "Bob".to_string()
            }
        );
    }

    #[test]
    fn leaderboard_orders_and_reports_requester() {
        let facade = facade();
        for (id, taps, name) in [(1, 50, "Fifty"), (2, 10, "Ten"), (3, 30, "Thirty")] {
            for _ in 0..taps {
                facade.handle_tap(PlayerId(id)).unwrap();
            }
            facade.request_name_change(PlayerId(id), name).unwrap();
        }

        let board = facade.get_leaderboard(PlayerId(3), 10).unwrap();
        let coins: Vec<u64> = board.entries.iter().map(|e| e.coins).collect();
        let ranks: Vec<u32> = board.entries.iter().map(|e| e.rank).collect();
        assert_eq!(coins, vec![50, 30, 10]);
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(board.requesting_player_rank, Rank::Position(2));
        assert_eq!(board.requesting_player_coins, 30);
        assert_eq!(board.aggregate.total_taps, 90);
        assert_eq!(board.aggregate.total_coins, 90);
    }

    #[test]
    fn leaderboard_does_not_create_requester() {
        let facade = facade();
        let board = facade.get_leaderboard(PlayerId(99), 10).unwrap();
        assert_eq!(board.requesting_player_rank.value(), 999);
        assert_eq!(board.requesting_player_coins, 0);
        assert_eq!(board.aggregate.player_count, 0);
    }

    #[test]
    fn start_session_refreshes_handle_without_touching_counters() {
        let facade = facade();
        let id = PlayerId(8);
        facade.start_session(id, Some("first")).unwrap();
        facade.handle_tap(id).unwrap();

        let state = facade.start_session(id, Some("second")).unwrap();
        assert_eq!(state.coins, 1);

        let record = facade.store().get(id).unwrap().unwrap();
        assert_eq!(record.handle(), Some("second"));
        assert_eq!(facade.get_stats(id).unwrap().label, "second");
    }

    #[test]
    fn stats_report_rank_sentinel_until_first_tap() {
        let facade = facade();
        let id = PlayerId(5);

        let stats = facade.get_stats(id).unwrap();
        assert_eq!(stats.rank, Rank::Unranked);
        assert_eq!(stats.label, "Player_5");

        facade.handle_tap(id).unwrap();
        assert_eq!(facade.get_stats(id).unwrap().rank, Rank::Position(1));
    }
}
