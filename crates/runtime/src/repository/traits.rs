//! Repository contract for player records.

use tap_core::ranking::{self, Aggregate, Rank, RankedPlayer};
use tap_core::{DisplayName, PlayerId, PlayerRecord};

use super::Result;

/// Durable storage of player records keyed by [`PlayerId`].
///
/// Every method is atomic with respect to other callers on the same store:
/// implementations hold one critical section per call, so read-modify-write
/// through [`update`](PlayerStore::update) never loses increments and display
/// name claims never race.
pub trait PlayerStore: Send + Sync {
    /// Load a record.
    fn get(&self, id: PlayerId) -> Result<Option<PlayerRecord>>;

    /// Create a zero-state record.
    ///
    /// Fails with `DuplicateKey` if the id is already present. Use
    /// [`get_or_create`](PlayerStore::get_or_create) when the record may exist.
    fn create(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerRecord>;

    /// Return the existing record, or create a zero-state one.
    ///
    /// Never touches the counters of an existing record.
    fn get_or_create(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerRecord>;

    /// Persist the mutable fields of `record` and stamp `last_active_at`.
    ///
    /// The stored `created_at` wins over the one carried by `record`. Fails
    /// with `NameTaken` if the record carries a display name owned by another
    /// player.
    fn upsert(&self, record: &PlayerRecord) -> Result<PlayerRecord>;

    /// Get-or-create `id`, apply `apply` to it and persist the result, all
    /// inside one critical section.
    fn update(
        &self,
        id: PlayerId,
        handle: Option<&str>,
        apply: &mut dyn FnMut(&mut PlayerRecord),
    ) -> Result<PlayerRecord>;

    /// Claim `name` for `id`.
    ///
    /// The uniqueness check ignores the caller's own current name, so
    /// re-setting the same name succeeds.
    fn set_display_name(&self, id: PlayerId, name: &DisplayName) -> Result<PlayerRecord>;

    /// Consistent copy of every record, ordered by id.
    fn snapshot(&self) -> Result<Vec<PlayerRecord>>;

    /// Count-based rank of `id`.
    fn rank(&self, id: PlayerId) -> Result<Rank> {
        Ok(ranking::rank_of(&self.snapshot()?, id))
    }

    /// Top `n` named players.
    fn top_n(&self, n: usize) -> Result<Vec<RankedPlayer>> {
        Ok(ranking::top_n(&self.snapshot()?, n))
    }

    /// Whole-store summary.
    fn aggregate(&self) -> Result<Aggregate> {
        Ok(ranking::aggregate(&self.snapshot()?))
    }
}
