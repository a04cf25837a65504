/// Game rules and tunable parameters.
///
/// The reward rule and name bounds are compile-time constants; only the
/// leaderboard size can be overridden at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Number of entries returned by the default leaderboard query.
    pub leaderboard_size: usize,
}

impl GameConfig {
    // ===== reward rule =====
    /// Coins credited for a single accepted tap.
    ///
    /// Kept at 1 so that `coins == total_taps` holds for every record.
    pub const COINS_PER_TAP: u64 = 1;

    // ===== display names =====
    /// Minimum display name length in characters, after trimming.
    pub const MIN_NAME_LEN: usize = 2;
    /// Maximum display name length in characters, after trimming.
    pub const MAX_NAME_LEN: usize = 20;

    // ===== ranking =====
    /// Rank value reported for players that have not earned any coins yet.
    pub const UNRANKED_SENTINEL: u64 = 999;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

    pub fn new() -> Self {
        Self {
            leaderboard_size: Self::DEFAULT_LEADERBOARD_SIZE,
        }
    }

    pub fn with_leaderboard_size(leaderboard_size: usize) -> Self {
        Self { leaderboard_size }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
