//! File-based PlayerStore implementation.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tap_core::{DisplayName, PlayerId, PlayerRecord};

use crate::repository::table::PlayerTable;
use crate::repository::{PlayerStore, RepositoryError, Result};

const PLAYERS_FILE: &str = "players.json";

/// On-disk layout of the player table.
#[derive(Serialize, Deserialize)]
struct PlayerFile {
    players: Vec<PlayerRecord>,
}

/// File-based implementation of PlayerStore.
///
/// The whole table lives in memory and is mirrored to a single JSON file:
///
/// ```text
/// {base_dir}/players.json
/// ```
///
/// Every mutation is applied to a staged copy of the table, written to a
/// temp file and atomically renamed over the previous file. The live table
/// is swapped only after the rename succeeds, so a failed write leaves both
/// the file and the in-memory view untouched.
pub struct FilePlayerStore {
    path: PathBuf,
    table: RwLock<PlayerTable>,
}

impl FilePlayerStore {
    /// Open (or initialise) the store in `base_dir`.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;

        let path = base_dir.join(PLAYERS_FILE);
        let table = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let file: PlayerFile = serde_json::from_str(&json).map_err(|e| {
                RepositoryError::Json(format!("Failed to deserialize player table: {}", e))
            })?;
            let count = file.players.len();
            let table = PlayerTable::from_records(file.players)?;
            tracing::info!("Loaded {} players from {}", count, path.display());
            table
        } else {
            PlayerTable::default()
        };

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &PlayerTable) -> Result<()> {
        let file = PlayerFile {
            players: table.records(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| {
            RepositoryError::Json(format!("Failed to serialize player table: {}", e))
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut temp = File::create(&temp_path)?;
        temp.write_all(json.as_bytes())?;
        temp.sync_all()?;
        drop(temp);

        fs::rename(&temp_path, &self.path)?;
        sync_parent_dir(&self.path)?;

        tracing::debug!(
            "Saved {} players to {}",
            file.players.len(),
            self.path.display()
        );
        Ok(())
    }

    fn read<T>(&self, op: impl FnOnce(&PlayerTable) -> T) -> Result<T> {
        let table = self
            .table
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(op(&*table))
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut PlayerTable) -> Result<T>) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let mut staged = table.clone();
        let output = op(&mut staged)?;
        if let Err(error) = self.persist(&staged) {
            tracing::error!("Failed to persist player table: {}", error);
            return Err(error);
        }
        *table = staged;

        Ok(output)
    }
}

/// Flush the directory entry so the rename itself survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        File::open(dir)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

impl PlayerStore for FilePlayerStore {
    fn get(&self, id: PlayerId) -> Result<Option<PlayerRecord>> {
        self.read(|table| table.get(id).cloned())
    }

    fn create(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerRecord> {
        self.mutate(|table| table.create(id, handle, Utc::now()))
    }

    fn get_or_create(&self, id: PlayerId, handle: Option<&str>) -> Result<PlayerRecord> {
        if let Some(record) = self.get(id)? {
            return Ok(record);
        }
        self.mutate(|table| Ok(table.get_or_create(id, handle, Utc::now())))
    }

    fn upsert(&self, record: &PlayerRecord) -> Result<PlayerRecord> {
        self.mutate(|table| table.upsert(record, Utc::now()))
    }

    fn update(
        &self,
        id: PlayerId,
        handle: Option<&str>,
        apply: &mut dyn FnMut(&mut PlayerRecord),
    ) -> Result<PlayerRecord> {
        self.mutate(|table| table.update(id, handle, Utc::now(), apply))
    }

    fn set_display_name(&self, id: PlayerId, name: &DisplayName) -> Result<PlayerRecord> {
        self.mutate(|table| table.set_display_name(id, name, Utc::now()))
    }

    fn snapshot(&self) -> Result<Vec<PlayerRecord>> {
        self.read(PlayerTable::records)
    }
}
