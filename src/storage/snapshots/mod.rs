//! Snapshot stores
//!
//! A `SnapshotStore` answers "which snapshots exist for this profile" and
//! persists the engine's changes to that answer. Two backends exist:
//!
//! - `IndexedSnapshotStore`: a JSON index is the authoritative list; every
//!   mutation is written through immediately.
//! - `ScanSnapshotStore`: the list is whatever folders exist under the
//!   profile's backup directory, described by an optional side-file.
//!
//! Both treat folders on disk as ground truth: an index entry whose folder is
//! gone is never returned from `list`.

mod indexed;
mod scan;

use std::fs;
use std::path::Path;

use crate::config::{BackvaultPaths, SnapshotBackend};
use crate::error::{BackvaultError, BackvaultResult};
use crate::models::{Profile, Snapshot};

pub use indexed::IndexedSnapshotStore;
pub use scan::ScanSnapshotStore;

/// How a rename request is carried out by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMode {
    /// Only the display name changes; the folder name is fixed at creation
    DisplayNameOnly,
    /// Display name and folder name are the same value, so the folder moves
    RenameFolder,
}

/// Persistence interface the backup engine works against
pub trait SnapshotStore: Send + Sync {
    /// Which backend this is
    fn backend(&self) -> SnapshotBackend;

    /// How renames are applied
    fn rename_mode(&self) -> RenameMode;

    /// File kept inside each snapshot folder by this backend, if any.
    /// It is never copied back into a source tree.
    fn side_file(&self) -> Option<&'static str> {
        None
    }

    /// Snapshots of `profile`, newest first. Never fails because the
    /// backup directory is missing.
    fn list(&self, profile: &Profile) -> BackvaultResult<Vec<Snapshot>>;

    /// Find one snapshot by folder name
    fn get(&self, profile: &Profile, folder_name: &str) -> BackvaultResult<Option<Snapshot>> {
        Ok(self
            .list(profile)?
            .into_iter()
            .find(|s| s.folder_name == folder_name))
    }

    /// Record a freshly copied snapshot; returns the snapshot as stored
    fn insert(&self, profile: &Profile, snapshot: Snapshot) -> BackvaultResult<Snapshot>;

    /// Change the display name of a snapshot
    fn set_display_name(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        display_name: &str,
    ) -> BackvaultResult<Snapshot>;

    /// Record that a snapshot's folder has been moved to `new_folder_name`
    fn record_folder_rename(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        new_folder_name: &str,
    ) -> BackvaultResult<Snapshot>;

    /// Forget a snapshot (its folder is already gone). Missing entries are fine.
    fn remove(&self, profile: &Profile, snapshot: &Snapshot) -> BackvaultResult<()>;

    /// Forget every snapshot of a profile
    fn remove_profile(&self, profile: &Profile) -> BackvaultResult<()>;
}

/// Open the store selected in settings
pub fn open_store(
    backend: SnapshotBackend,
    paths: &BackvaultPaths,
) -> BackvaultResult<Box<dyn SnapshotStore>> {
    Ok(match backend {
        SnapshotBackend::Indexed => {
            Box::new(IndexedSnapshotStore::open(paths.snapshot_index_file())?)
        }
        SnapshotBackend::Scan => Box::new(ScanSnapshotStore::new()),
    })
}

/// Names of the immediate subdirectories of `dir`; empty if `dir` is missing
pub(crate) fn snapshot_folders(dir: &Path) -> BackvaultResult<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut folders = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| {
        BackvaultError::Io(format!("Failed to read {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let entry = entry
            .map_err(|e| BackvaultError::Io(format!("Failed to read directory entry: {}", e)))?;

        if !entry.path().is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => folders.push(name),
            Err(raw) => tracing::warn!(folder = ?raw, "skipping snapshot folder with non UTF-8 name"),
        }
    }

    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_folders_missing_dir() {
        let temp = TempDir::new().unwrap();
        let folders = snapshot_folders(&temp.path().join("nope")).unwrap();
        assert!(folders.is_empty());
    }

    #[test]
    fn test_snapshot_folders_ignores_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("2025-01-01_000000")).unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();

        let folders = snapshot_folders(temp.path()).unwrap();
        assert_eq!(folders, vec!["2025-01-01_000000".to_string()]);
    }

    #[test]
    fn test_open_store_by_backend() {
        let temp = TempDir::new().unwrap();
        let paths = BackvaultPaths::with_base_dir(temp.path().to_path_buf());

        let indexed = open_store(SnapshotBackend::Indexed, &paths).unwrap();
        assert_eq!(indexed.rename_mode(), RenameMode::DisplayNameOnly);
        assert!(indexed.side_file().is_none());

        let scan = open_store(SnapshotBackend::Scan, &paths).unwrap();
        assert_eq!(scan.rename_mode(), RenameMode::RenameFolder);
        assert!(scan.side_file().is_some());
    }
}
