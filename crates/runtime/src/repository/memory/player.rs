//! In-memory PlayerStore implementation for tests and local runs.

use std::sync::RwLock;

use chrono::Utc;
use tap_core::{DisplayName, PlayerId, PlayerRecord};

use crate::repository::table::PlayerTable;
use crate::repository::{PlayerStore, RepositoryError, Result};

/// In-memory implementation of PlayerStore.
///
/// Thread-safe but not persistent across process restarts.
pub struct InMemoryPlayerStore {
    table: RwLock<PlayerTable>,
}

impl InMemoryPlayerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PlayerTable::default()),
        }
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: Vec<PlayerRecord>) -> Result<Self> {
        Ok(Self {
            table: RwLock::new(PlayerTable::from_records(records)?),
        })
    }

    fn read<T>(&self, op: impl FnOnce(&PlayerTable) -> T) -> Result<T> {
        let table = self
            .table
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(op(&*table))
    }

    fn write<T>(&self, op: impl FnOnce(&mut PlayerTable) -> Result<T>) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        op(&mut *table)
    }
}

impl Default for InMemoryPlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn get(&self, id: PlayerId) -> Result<Option<PlayerRecord>> {
        self.read(|table| table.get(id).cloned())
    }

    fn create(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerRecord> {
        self.write(|table| table.create(id, handle, Utc::now()))
    }

    fn get_or_create(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerRecord> {
        self.write(|table| Ok(table.get_or_create(id, handle, Utc::now())))
    }

    fn upsert(&self, record: &PlayerRecord) -> Result<PlayerRecord> {
        self.write(|table| table.upsert(record, Utc::now()))
    }

    fn update(
        &self,
        id: PlayerId,
        handle: Option<&str>,
        apply: &mut dyn FnMut(&mut PlayerRecord),
    ) -> Result<PlayerRecord> {
        self.write(|table| table.update(id, handle, Utc::now(), apply))
    }

    fn set_display_name(&self, id: PlayerId, name: &DisplayName) -> Result<PlayerRecord> {
        self.write(|table| table.set_display_name(id, name, Utc::now()))
    }

    fn snapshot(&self) -> Result<Vec<PlayerRecord>> {
        self.read(PlayerTable::records)
    }
}
