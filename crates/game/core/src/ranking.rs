//! Leaderboard and rank computation over a store snapshot.
//!
//! Two ranking policies coexist and must not be merged:
//! - [`rank_of`] is count-based: players with equal coins share a rank.
//! - [`top_n`] is position-based: entries are numbered `1..=n` with no ties.

use std::cmp::Reverse;
use std::fmt;

use crate::config::GameConfig;
use crate::state::{PlayerId, PlayerRecord};

/// Rank of a single player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rank {
    /// 1-based position: one more than the number of players with strictly
    /// more coins.
    Position(u64),
    /// The player is unknown or has not earned any coins yet.
    Unranked,
}

impl Rank {
    /// Numeric value as reported to clients.
    ///
    /// `Unranked` maps to [`GameConfig::UNRANKED_SENTINEL`], which cannot be
    /// told apart from a genuine position of the same value.
    pub fn value(&self) -> u64 {
        match self {
            Self::Position(position) => *position,
            Self::Unranked => GameConfig::UNRANKED_SENTINEL,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, Self::Position(_))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Leaderboard entry with its resolved label.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedPlayer {
    #[cfg_attr(feature = "serde", serde(rename = "user_id"))]
    pub id: PlayerId,
    pub name: String,
    pub coins: u64,
    pub total_taps: u64,
    pub rank: u32,
}

/// Whole-store summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aggregate {
    pub player_count: u64,
    pub total_coins: u64,
    pub total_taps: u64,
}

/// Computes the count-based rank of `id`.
pub fn rank_of(records: &[PlayerRecord], id: PlayerId) -> Rank {
    let Some(coins) = records
        .iter()
        .find(|record| record.id() == id)
        .map(PlayerRecord::coins)
    else {
        return Rank::Unranked;
    };

    if coins == 0 {
        return Rank::Unranked;
    }

    let ahead = records.iter().filter(|record| record.coins() > coins).count() as u64;
    Rank::Position(ahead + 1)
}

/// Selects the top `n` named players by coins.
///
/// Players without a display name are excluded. Equal balances are ordered by
/// ascending id so repeated queries return the same sequence.
pub fn top_n(records: &[PlayerRecord], n: usize) -> Vec<RankedPlayer> {
    let mut named: Vec<&PlayerRecord> = records.iter().filter(|r| r.has_name()).collect();
    named.sort_by_key(|record| (Reverse(record.coins()), record.id()));

    named
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, record)| RankedPlayer {
            id: record.id(),
            name: record.label(),
            coins: record.coins(),
            total_taps: record.total_taps(),
            rank: idx as u32 + 1,
        })
        .collect()
}

/// Sums counters across all records.
pub fn aggregate(records: &[PlayerRecord]) -> Aggregate {
    records.iter().fold(Aggregate::default(), |acc, record| Aggregate {
        player_count: acc.player_count + 1,
        total_coins: acc.total_coins.saturating_add(record.coins()),
        total_taps: acc.total_taps.saturating_add(record.total_taps()),
    })
}
