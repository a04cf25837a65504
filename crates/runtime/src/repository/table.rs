//! Keyed player table shared by the store implementations.
//!
//! Keeps a reverse index from display name to owner so uniqueness checks are
//! a single lookup. Callers provide the locking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tap_core::{DisplayName, PlayerId, PlayerRecord};

use super::{RepositoryError, Result};

#[derive(Clone, Debug, Default)]
pub(crate) struct PlayerTable {
    players: HashMap<PlayerId, PlayerRecord>,
    names: HashMap<String, PlayerId>,
}

impl PlayerTable {
    /// Rebuild a table from persisted records, rejecting duplicate ids or
    /// names and records that break the balance or name rules.
    pub(crate) fn from_records(records: Vec<PlayerRecord>) -> Result<Self> {
        let mut table = Self::default();
        for record in records {
            let id = record.id();
            check_record(&record)?;
            if let Some(name) = record.display_name() {
                if let Some(owner) = table.names.insert(name.to_owned(), id) {
                    return Err(RepositoryError::CorruptedData(format!(
                        "display name {name:?} held by players {owner} and {id}"
                    )));
                }
            }
            if table.players.insert(id, record).is_some() {
                return Err(RepositoryError::CorruptedData(format!(
                    "duplicate player id {id}"
                )));
            }
        }
        Ok(table)
    }

    pub(crate) fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.get(&id)
    }

    pub(crate) fn create(
        &mut self,
        id: PlayerId,
        handle: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PlayerRecord> {
        if self.players.contains_key(&id) {
            return Err(RepositoryError::DuplicateKey(id));
        }
        let record = PlayerRecord::new(id, handle.map(str::to_owned), now);
        self.players.insert(id, record.clone());
        tracing::info!(player = %id, "created player record");
        Ok(record)
    }

    pub(crate) fn get_or_create(
        &mut self,
        id: PlayerId,
        handle: Option<&str>,
        now: DateTime<Utc>,
    ) -> PlayerRecord {
        match self.players.get(&id) {
            Some(record) => record.clone(),
            None => {
                let record = PlayerRecord::new(id, handle.map(str::to_owned), now);
                self.players.insert(id, record.clone());
                tracing::info!(player = %id, "created player record");
                record
            }
        }
    }

    /// Write the mutable fields of `incoming`, keeping the name index in sync.
    pub(crate) fn upsert(
        &mut self,
        incoming: &PlayerRecord,
        now: DateTime<Utc>,
    ) -> Result<PlayerRecord> {
        let id = incoming.id();
        let new_name = incoming.display_name();

        if let Some(name) = new_name
            && let Some(owner) = self.names.get(name)
            && *owner != id
        {
            return Err(RepositoryError::NameTaken {
                name: name.to_owned(),
            });
        }

        let mut stored = match self.players.get(&id) {
            Some(existing) => {
                let mut merged = existing.clone();
                merged.overwrite_mutable(incoming);
                merged
            }
            None => incoming.clone(),
        };
        stored.touch(now);

        let old_name = self
            .players
            .get(&id)
            .and_then(|r| r.display_name())
            .map(str::to_owned);
        if old_name.as_deref() != new_name {
            if let Some(old) = old_name {
                self.names.remove(&old);
            }
            if let Some(name) = new_name {
                self.names.insert(name.to_owned(), id);
            }
        }

        self.players.insert(id, stored.clone());
        Ok(stored)
    }

    pub(crate) fn update(
        &mut self,
        id: PlayerId,
        handle: Option<&str>,
        now: DateTime<Utc>,
        apply: &mut dyn FnMut(&mut PlayerRecord),
    ) -> Result<PlayerRecord> {
        let mut record = self.get_or_create(id, handle, now);
        apply(&mut record);
        self.upsert(&record, now)
    }

    pub(crate) fn set_display_name(
        &mut self,
        id: PlayerId,
        name: &DisplayName,
        now: DateTime<Utc>,
    ) -> Result<PlayerRecord> {
        let mut record = self
            .players
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))?;
        record.set_display_name(name, now);
        let stored = self.upsert(&record, now)?;
        tracing::info!(player = %id, name = %name, "display name set");
        Ok(stored)
    }

    /// All records ordered by id.
    pub(crate) fn records(&self) -> Vec<PlayerRecord> {
        let mut records: Vec<PlayerRecord> = self.players.values().cloned().collect();
        records.sort_unstable_by_key(PlayerRecord::id);
        records
    }
}

fn check_record(record: &PlayerRecord) -> Result<()> {
    let id = record.id();
    if record.coins() != record.total_taps() {
        return Err(RepositoryError::CorruptedData(format!(
            "player {id} has {} coins but {} taps",
            record.coins(),
            record.total_taps()
        )));
    }
    if let Some(name) = record.display_name() {
        let valid = DisplayName::parse(name).is_ok_and(|parsed| parsed.as_str() == name);
        if !valid {
            return Err(RepositoryError::CorruptedData(format!(
                "player {id} has invalid display name {name:?}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> DisplayName {
        DisplayName::parse(raw).unwrap()
    }

    #[test]
    fn renaming_releases_the_old_name() {
        let now = Utc::now();
        let mut table = PlayerTable::default();
        table.create(PlayerId(1), None, now).unwrap();
        table.create(PlayerId(2), None, now).unwrap();

        table.set_display_name(PlayerId(1), &name("Alice"), now).unwrap();
        table.set_display_name(PlayerId(1), &name("Alicia"), now).unwrap();

        let record = table.set_display_name(PlayerId(2), &name("Alice"), now).unwrap();
        assert_eq!(record.display_name(), Some("Alice"));
    }

    #[test]
    fn from_records_rejects_duplicate_names() {
        let now = Utc::now();
        let mut a = PlayerRecord::new(PlayerId(1), None, now);
        let mut b = PlayerRecord::new(PlayerId(2), None, now);
        a.set_display_name(&name("Twin"), now);
        b.set_display_name(&name("Twin"), now);

        let err = PlayerTable::from_records(vec![a, b]).unwrap_err();
        assert!(matches!(err, RepositoryError::CorruptedData(_)));
    }

    #[test]
    fn from_records_rejects_unbalanced_counters() {
        let record: PlayerRecord = serde_json::from_value(serde_json::json!({
            "id": 4,
            "handle": null,
            "display_name": null,
            "coins": 500,
            "total_taps": 3,
            "created_at": "2024-01-01T00:00:00Z",
            "last_active_at": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        let err = PlayerTable::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, RepositoryError::CorruptedData(_)));
    }

    #[test]
    fn from_records_rejects_out_of_bounds_names() {
        for bad in ["x", " padded ", "abcdefghijklmnopqrstu"] {
            let record: PlayerRecord = serde_json::from_value(serde_json::json!({
                "id": 5,
                "handle": null,
                "display_name": bad,
                "coins": 0,
                "total_taps": 0,
                "created_at": "2024-01-01T00:00:00Z",
                "last_active_at": "2024-01-01T00:00:00Z",
            }))
            .unwrap();

            let err = PlayerTable::from_records(vec![record]).unwrap_err();
            assert!(matches!(err, RepositoryError::CorruptedData(_)), "{bad:?}");
        }
    }

    #[test]
    fn from_records_rejects_duplicate_ids() {
        let now = Utc::now();
        let a = PlayerRecord::new(PlayerId(1), None, now);
        let err = PlayerTable::from_records(vec![a.clone(), a]).unwrap_err();
        assert!(matches!(err, RepositoryError::CorruptedData(_)));
    }

    #[test]
    fn update_that_steals_a_name_is_rejected_without_mutation() {
        let now = Utc::now();
        let mut table = PlayerTable::default();
        table.create(PlayerId(1), None, now).unwrap();
        table.set_display_name(PlayerId(1), &name("Owner"), now).unwrap();

        let stolen = name("Owner");
        let err = table
            .update(PlayerId(2), None, now, &mut |record| {
                record.apply_tap(now);
                record.set_display_name(&stolen, now);
            })
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NameTaken { .. }));

        // The lazily created record exists but the tap was not committed.
        let record = table.get(PlayerId(2)).unwrap();
        assert_eq!(record.coins(), 0);
        assert!(!record.has_name());
    }
}
