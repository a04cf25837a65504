//! Authoritative player record representation.
//!
//! Stores clone and persist these records but mutate counters exclusively
//! through [`PlayerRecord::apply_tap`], which keeps `coins` and `total_taps`
//! in lockstep.
pub mod name;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::config::GameConfig;
pub use name::DisplayName;

/// Externally supplied identity of a player (the chat platform user id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PlayerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Coins and taps credited by a single accepted tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapReward {
    pub coins_added: u64,
    pub taps_added: u64,
}

/// One persisted player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRecord {
    id: PlayerId,
    /// Platform login or alias. Informational, not unique.
    handle: Option<String>,
    /// Player-chosen name, unique across the store when present.
    display_name: Option<String>,
    coins: u64,
    total_taps: u64,
    created_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Creates a zero-state record.
    pub fn new(id: PlayerId, handle: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            handle: handle.filter(|h| !h.is_empty()),
            display_name: None,
            coins: 0,
            total_taps: 0,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn has_name(&self) -> bool {
        self.display_name().is_some()
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn total_taps(&self) -> u64 {
        self.total_taps
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    /// Label shown on leaderboards: display name, then handle, then a
    /// generated placeholder.
    pub fn label(&self) -> String {
        self.display_name()
            .or_else(|| self.handle().filter(|h| !h.is_empty()))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Player_{}", self.id))
    }

    /// Credits one tap under the current reward rule.
    pub fn apply_tap(&mut self, now: DateTime<Utc>) -> TapReward {
        self.total_taps = self.total_taps.saturating_add(1);
        self.coins = self.coins.saturating_add(GameConfig::COINS_PER_TAP);
        self.last_active_at = now;
        TapReward {
            coins_added: GameConfig::COINS_PER_TAP,
            taps_added: 1,
        }
    }

    /// Overwrites the handle when the platform login changed.
    ///
    /// Empty handles are ignored. Returns `true` if the record was modified.
    pub fn refresh_handle(&mut self, handle: &str, now: DateTime<Utc>) -> bool {
        if handle.is_empty() || self.handle.as_deref() == Some(handle) {
            return false;
        }
        self.handle = Some(handle.to_owned());
        self.last_active_at = now;
        true
    }

    pub fn set_display_name(&mut self, name: &DisplayName, now: DateTime<Utc>) {
        self.display_name = Some(name.as_str().to_owned());
        self.last_active_at = now;
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active_at = now;
    }

    /// Copies every mutable field from `incoming`, leaving `id` and
    /// `created_at` untouched.
    pub fn overwrite_mutable(&mut self, incoming: &PlayerRecord) {
        self.handle = incoming.handle.clone();
        self.display_name = incoming.display_name.clone();
        self.coins = incoming.coins;
        self.total_taps = incoming.total_taps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> PlayerRecord {
        PlayerRecord::new(PlayerId(id), None, Utc::now())
    }

    #[test]
    fn new_record_is_zeroed() {
        let record = PlayerRecord::new(PlayerId(7), Some("neo".into()), Utc::now());
        assert_eq!(record.coins(), 0);
        assert_eq!(record.total_taps(), 0);
        assert!(!record.has_name());
        assert_eq!(record.handle(), Some("neo"));
        assert_eq!(record.created_at(), record.last_active_at());
    }

    #[test]
    fn tap_keeps_coins_and_taps_equal() {
        let mut record = record(1);
        for _ in 0..5 {
            let reward = record.apply_tap(Utc::now());
            assert_eq!(reward.coins_added, 1);
        }
        assert_eq!(record.coins(), 5);
        assert_eq!(record.total_taps(), 5);
    }

    #[test]
    fn label_falls_back_to_handle_then_placeholder() {
        let mut record = record(42);
        assert_eq!(record.label(), "Player_42");

        record.refresh_handle("trinity", Utc::now());
        assert_eq!(record.label(), "trinity");

        let name = DisplayName::parse("Morpheus").unwrap();
        record.set_display_name(&name, Utc::now());
        assert_eq!(record.label(), "Morpheus");
    }

    #[test]
    fn refresh_handle_ignores_empty_and_unchanged() {
        let mut record = PlayerRecord::new(PlayerId(3), Some("old".into()), Utc::now());
        assert!(!record.refresh_handle("", Utc::now()));
        assert!(!record.refresh_handle("old", Utc::now()));
        assert!(record.refresh_handle("new", Utc::now()));
        assert_eq!(record.handle(), Some("new"));
    }

    #[test]
    fn overwrite_mutable_preserves_identity_and_creation() {
        let mut stored = record(9);
        let created = stored.created_at();

        let mut incoming = PlayerRecord::new(PlayerId(9), Some("h".into()), Utc::now());
        incoming.apply_tap(Utc::now());

        stored.overwrite_mutable(&incoming);
        assert_eq!(stored.coins(), 1);
        assert_eq!(stored.handle(), Some("h"));
        assert_eq!(stored.created_at(), created);
    }
}
