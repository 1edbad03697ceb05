//! JSON-indexed snapshot store
//!
//! Keeps one record per snapshot in snapshots.json. The index is the list of
//! known snapshots; folders on disk decide which of them are still real.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SnapshotBackend;
use crate::error::{BackvaultError, BackvaultResult};
use crate::models::{Profile, ProfileId, Snapshot, SnapshotId};
use crate::storage::file_io::{read_json, write_json_atomic};

use super::{snapshot_folders, RenameMode, SnapshotStore};

/// One row of the snapshot index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotRecord {
    id: SnapshotId,
    profile_id: ProfileId,
    display_name: String,
    folder_name: String,
    created: DateTime<Utc>,
}

impl SnapshotRecord {
    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            profile_id: self.profile_id,
            folder_name: self.folder_name.clone(),
            display_name: self.display_name.clone(),
            created: self.created,
        }
    }

    fn is(&self, profile_id: ProfileId, folder_name: &str) -> bool {
        self.profile_id == profile_id && self.folder_name == folder_name
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IndexData {
    snapshots: Vec<SnapshotRecord>,
}

/// Snapshot store backed by a JSON index file
pub struct IndexedSnapshotStore {
    path: PathBuf,
    data: RwLock<Vec<SnapshotRecord>>,
}

impl IndexedSnapshotStore {
    /// Open the index at `path`, loading any existing records
    pub fn open(path: PathBuf) -> BackvaultResult<Self> {
        let file_data: IndexData = read_json(&path)?;
        Ok(Self {
            path,
            data: RwLock::new(file_data.snapshots),
        })
    }

    fn save(&self, records: &[SnapshotRecord]) -> BackvaultResult<()> {
        let file_data = IndexData {
            snapshots: records.to_vec(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    fn read(&self) -> BackvaultResult<std::sync::RwLockReadGuard<'_, Vec<SnapshotRecord>>> {
        self.data
            .read()
            .map_err(|e| BackvaultError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BackvaultResult<std::sync::RwLockWriteGuard<'_, Vec<SnapshotRecord>>> {
        self.data
            .write()
            .map_err(|e| BackvaultError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Apply `change` to the record for `snapshot` and write the index through
    fn update<F>(&self, profile: &Profile, snapshot: &Snapshot, change: F) -> BackvaultResult<Snapshot>
    where
        F: FnOnce(&mut SnapshotRecord),
    {
        let mut data = self.write()?;
        let record = data
            .iter_mut()
            .find(|r| r.is(profile.id, &snapshot.folder_name))
            .ok_or_else(|| BackvaultError::snapshot_not_found(snapshot.folder_name.clone()))?;

        change(record);
        let updated = record.to_snapshot();
        self.save(&data)?;
        Ok(updated)
    }
}

impl SnapshotStore for IndexedSnapshotStore {
    fn backend(&self) -> SnapshotBackend {
        SnapshotBackend::Indexed
    }

    fn rename_mode(&self) -> RenameMode {
        RenameMode::DisplayNameOnly
    }

    fn list(&self, profile: &Profile) -> BackvaultResult<Vec<Snapshot>> {
        let on_disk: HashSet<String> = snapshot_folders(&profile.backup_path)?
            .into_iter()
            .collect();

        let data = self.read()?;
        let mut indexed = HashSet::new();
        let mut snapshots = Vec::new();

        for record in data.iter().filter(|r| r.profile_id == profile.id) {
            indexed.insert(record.folder_name.as_str());
            if on_disk.contains(&record.folder_name) {
                snapshots.push(record.to_snapshot());
            } else {
                tracing::debug!(
                    profile = %profile.name,
                    folder = %record.folder_name,
                    "index entry has no folder on disk, hiding it"
                );
            }
        }

        for folder in on_disk.iter().filter(|f| !indexed.contains(f.as_str())) {
            tracing::warn!(
                profile = %profile.name,
                folder = %folder,
                "untracked folder in backup directory, skipping"
            );
        }

        snapshots.sort_by(Snapshot::cmp_newest_first);
        Ok(snapshots)
    }

    fn insert(&self, profile: &Profile, snapshot: Snapshot) -> BackvaultResult<Snapshot> {
        let mut data = self.write()?;
        // The folder was just created, so a matching record can only be a ghost
        // left behind by a folder removed outside the engine
        let before = data.len();
        data.retain(|r| !r.is(profile.id, &snapshot.folder_name));
        if data.len() != before {
            tracing::debug!(
                profile = %profile.name,
                folder = %snapshot.folder_name,
                "replacing stale index entry"
            );
        }

        data.push(SnapshotRecord {
            id: SnapshotId::new(),
            profile_id: profile.id,
            display_name: snapshot.display_name.clone(),
            folder_name: snapshot.folder_name.clone(),
            created: snapshot.created,
        });
        self.save(&data)?;
        Ok(snapshot)
    }

    fn set_display_name(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        display_name: &str,
    ) -> BackvaultResult<Snapshot> {
        self.update(profile, snapshot, |r| r.display_name = display_name.to_string())
    }

    fn record_folder_rename(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        new_folder_name: &str,
    ) -> BackvaultResult<Snapshot> {
        self.update(profile, snapshot, |r| r.folder_name = new_folder_name.to_string())
    }

    fn remove(&self, profile: &Profile, snapshot: &Snapshot) -> BackvaultResult<()> {
        let mut data = self.write()?;
        let before = data.len();
        data.retain(|r| !r.is(profile.id, &snapshot.folder_name));
        if data.len() != before {
            self.save(&data)?;
        }
        Ok(())
    }

    fn remove_profile(&self, profile: &Profile) -> BackvaultResult<()> {
        let mut data = self.write()?;
        let before = data.len();
        data.retain(|r| r.profile_id != profile.id);
        if data.len() != before {
            self.save(&data)?;
        }
        Ok(())
    }
}
