//! Folder-scan snapshot store
//!
//! Every subdirectory of a profile's backup directory is a snapshot. There is
//! no index to keep in sync: a side-file inside each folder remembers the
//! display name and creation instant, and the next scan reflects any change
//! made on disk.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::config::SnapshotBackend;
use crate::error::{BackvaultError, BackvaultResult};
use crate::models::snapshot::{parse_folder_timestamp, METADATA_FILE_NAME};
use crate::models::{Profile, Snapshot, SnapshotMetadata};
use crate::storage::file_io::{read_json_optional, write_json_atomic};

use super::{snapshot_folders, RenameMode, SnapshotStore};

/// Snapshot store that derives everything from the backup directory
#[derive(Debug, Default)]
pub struct ScanSnapshotStore;

impl ScanSnapshotStore {
    /// Create a scan store
    pub fn new() -> Self {
        Self
    }

    /// Side-file contents for `folder`, or `None` when missing or unreadable
    fn read_metadata(folder: &Path) -> Option<SnapshotMetadata> {
        let path = folder.join(METADATA_FILE_NAME);
        match read_json_optional::<SnapshotMetadata, _>(&path) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "ignoring malformed snapshot metadata");
                None
            }
        }
    }

    fn write_metadata(folder: &Path, snapshot: &Snapshot) -> BackvaultResult<()> {
        let meta = SnapshotMetadata {
            display_name: snapshot.display_name.clone(),
            created: Some(snapshot.created),
        };
        write_json_atomic(folder.join(METADATA_FILE_NAME), &meta)
    }

    fn describe(profile: &Profile, folder_name: String) -> Snapshot {
        let folder = profile.snapshot_dir(&folder_name);
        let meta = Self::read_metadata(&folder);

        let created = meta
            .as_ref()
            .and_then(|m| m.created)
            .or_else(|| parse_folder_timestamp(&folder_name))
            .unwrap_or_else(|| filesystem_time(&folder));

        let display_name = meta
            .map(|m| m.display_name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| folder_name.clone());

        Snapshot {
            profile_id: profile.id,
            folder_name,
            display_name,
            created,
        }
    }
}

/// Creation time of a folder, falling back to its modification time
fn filesystem_time(folder: &Path) -> DateTime<Utc> {
    let time = fs::metadata(folder)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    DateTime::<Utc>::from(time)
}

impl SnapshotStore for ScanSnapshotStore {
    fn backend(&self) -> SnapshotBackend {
        SnapshotBackend::Scan
    }

    fn rename_mode(&self) -> RenameMode {
        RenameMode::RenameFolder
    }

    fn side_file(&self) -> Option<&'static str> {
        Some(METADATA_FILE_NAME)
    }

    fn list(&self, profile: &Profile) -> BackvaultResult<Vec<Snapshot>> {
        let mut snapshots: Vec<Snapshot> = snapshot_folders(&profile.backup_path)?
            .into_iter()
            .map(|folder| Self::describe(profile, folder))
            .collect();

        snapshots.sort_by(Snapshot::cmp_newest_first);
        Ok(snapshots)
    }

    fn get(&self, profile: &Profile, folder_name: &str) -> BackvaultResult<Option<Snapshot>> {
        if profile.snapshot_dir(folder_name).is_dir() {
            Ok(Some(Self::describe(profile, folder_name.to_string())))
        } else {
            Ok(None)
        }
    }

    fn insert(&self, profile: &Profile, mut snapshot: Snapshot) -> BackvaultResult<Snapshot> {
        // Folder name doubles as the display name on this backend
        snapshot.display_name = snapshot.folder_name.clone();
        Self::write_metadata(&profile.snapshot_dir(&snapshot.folder_name), &snapshot)?;
        Ok(snapshot)
    }

    fn set_display_name(
        &self,
        _profile: &Profile,
        snapshot: &Snapshot,
        _display_name: &str,
    ) -> BackvaultResult<Snapshot> {
        Err(BackvaultError::Storage(format!(
            "Snapshot '{}' can only be renamed by moving its folder",
            snapshot.folder_name
        )))
    }

    fn record_folder_rename(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        new_folder_name: &str,
    ) -> BackvaultResult<Snapshot> {
        let renamed = Snapshot {
            profile_id: profile.id,
            folder_name: new_folder_name.to_string(),
            display_name: new_folder_name.to_string(),
            created: snapshot.created,
        };
        Self::write_metadata(&profile.snapshot_dir(new_folder_name), &renamed)?;
        Ok(renamed)
    }

    fn remove(&self, _profile: &Profile, _snapshot: &Snapshot) -> BackvaultResult<()> {
        Ok(())
    }

    fn remove_profile(&self, _profile: &Profile) -> BackvaultResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Profile) {
        let temp = TempDir::new().unwrap();
        let backup = temp.path().join("bk");
        fs::create_dir(&backup).unwrap();
        let profile = Profile::new("Docs", temp.path().join("src"), backup);
        (temp, profile)
    }

    #[test]
    fn test_adopts_folders_without_metadata() {
        let (_temp, profile) = fixture();
        fs::create_dir(profile.snapshot_dir("2025-02-01_080000")).unwrap();
        fs::create_dir(profile.snapshot_dir("2025-02-03_080000")).unwrap();

        let listed = ScanSnapshotStore::new().list(&profile).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].folder_name, "2025-02-03_080000");
        assert_eq!(listed[0].display_name, "2025-02-03_080000");
        assert_eq!(
            listed[1].created,
            parse_folder_timestamp("2025-02-01_080000").unwrap()
        );
    }

    #[test]
    fn test_metadata_overrides_folder_name() {
        let (_temp, profile) = fixture();
        let folder = profile.snapshot_dir("custom");
        fs::create_dir(&folder).unwrap();
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        write_json_atomic(
            folder.join(METADATA_FILE_NAME),
            &SnapshotMetadata {
                display_name: "custom".into(),
                created: Some(created),
            },
        )
        .unwrap();

        let snapshot = ScanSnapshotStore::new().get(&profile, "custom").unwrap().unwrap();
        assert_eq!(snapshot.created, created);
    }

    #[test]
    fn test_malformed_metadata_defaults_to_folder_name() {
        let (_temp, profile) = fixture();
        let folder = profile.snapshot_dir("2025-02-01_080000");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join(METADATA_FILE_NAME), "{ not json").unwrap();

        let listed = ScanSnapshotStore::new().list(&profile).unwrap();
        assert_eq!(listed[0].display_name, "2025-02-01_080000");
    }

    #[test]
    fn test_insert_writes_side_file() {
        let (_temp, profile) = fixture();
        let now = Local.with_ymd_and_hms(2025, 2, 5, 9, 30, 0).earliest().unwrap();
        let snapshot = Snapshot::taken_at(profile.id, now);
        fs::create_dir(profile.snapshot_dir(&snapshot.folder_name)).unwrap();

        let stored = ScanSnapshotStore::new().insert(&profile, snapshot.clone()).unwrap();
        assert_eq!(stored.display_name, stored.folder_name);
        assert!(profile
            .snapshot_dir(&snapshot.folder_name)
            .join(METADATA_FILE_NAME)
            .exists());
    }

    #[test]
    fn test_rename_keeps_created() {
        let (_temp, profile) = fixture();
        let store = ScanSnapshotStore::new();
        let now = Local.with_ymd_and_hms(2025, 2, 6, 9, 30, 0).earliest().unwrap();
        let snapshot = Snapshot::taken_at(profile.id, now);
        fs::create_dir(profile.snapshot_dir(&snapshot.folder_name)).unwrap();
        let stored = store.insert(&profile, snapshot).unwrap();

        fs::rename(
            profile.snapshot_dir(&stored.folder_name),
            profile.snapshot_dir("Before upgrade"),
        )
        .unwrap();
        store
            .record_folder_rename(&profile, &stored, "Before upgrade")
            .unwrap();

        let listed = store.list(&profile).unwrap();
        assert_eq!(listed[0].folder_name, "Before upgrade");
        assert_eq!(listed[0].display_name, "Before upgrade");
        assert_eq!(listed[0].created, stored.created);
    }
}
