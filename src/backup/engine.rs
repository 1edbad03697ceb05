//! Backup engine
//!
//! Orchestrates the snapshot lifecycle for a profile: create, rename,
//! restore and delete. Every operation holds the profile's lock for its
//! whole duration and records its outcome in the activity log, success or
//! failure.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::error::{BackvaultError, BackvaultResult, ValidationError};
use crate::models::{Profile, Snapshot};
use crate::storage::snapshots::snapshot_folders;
use crate::storage::{RenameMode, Storage};

use super::copy::{clear_directory, copy_tree, CopyOptions, CopyStats};
use super::naming::{resolve_unique_name, validate_snapshot_name};
use super::report::{CascadeReport, RestoreReport};

/// Service for snapshot lifecycle operations
pub struct BackupEngine<'a> {
    storage: &'a Storage,
}

impl<'a> BackupEngine<'a> {
    /// Create a new backup engine
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Snapshots of a profile, newest first
    pub fn list(&self, profile: &Profile) -> BackvaultResult<Vec<Snapshot>> {
        self.storage.snapshots.list(profile)
    }

    /// Get a snapshot by folder name
    pub fn get(&self, profile: &Profile, folder_name: &str) -> BackvaultResult<Option<Snapshot>> {
        self.storage.snapshots.get(profile, folder_name)
    }

    /// Find a snapshot by folder name, or by display name (case-insensitive)
    /// when exactly one snapshot carries it
    pub fn find(&self, profile: &Profile, identifier: &str) -> BackvaultResult<Option<Snapshot>> {
        let identifier = identifier.trim();
        let snapshots = self.list(profile)?;

        if let Some(snapshot) = snapshots.iter().find(|s| s.folder_name == identifier) {
            return Ok(Some(snapshot.clone()));
        }

        let wanted = identifier.to_lowercase();
        let mut by_name = snapshots
            .into_iter()
            .filter(|s| s.display_name.to_lowercase() == wanted);
        match (by_name.next(), by_name.next()) {
            (Some(snapshot), None) => Ok(Some(snapshot)),
            _ => Ok(None),
        }
    }

    /// Like `find`, but a missing snapshot is an error
    pub fn require(&self, profile: &Profile, identifier: &str) -> BackvaultResult<Snapshot> {
        self.find(profile, identifier)?
            .ok_or_else(|| BackvaultError::snapshot_not_found(identifier))
    }

    /// Absolute path of a snapshot's folder
    pub fn snapshot_dir(&self, profile: &Profile, snapshot: &Snapshot) -> PathBuf {
        profile.snapshot_dir(&snapshot.folder_name)
    }

    /// Flag that cancels the running copy at the next file boundary
    ///
    /// Create and restore reset it once they hold the profile lock, so a
    /// cancel requested while nothing was copying has no effect.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.storage.cancel_flag()
    }

    /// Take a full-copy snapshot of the profile's source directory now
    pub fn create_snapshot(&self, profile: &Profile) -> BackvaultResult<Snapshot> {
        self.create_snapshot_at(profile, Local::now())
    }

    /// Take a snapshot stamped with `now`
    ///
    /// Fails with a collision when a folder for the same second already
    /// exists; an existing snapshot is never written into.
    pub fn create_snapshot_at(
        &self,
        profile: &Profile,
        now: DateTime<Local>,
    ) -> BackvaultResult<Snapshot> {
        let result = self.create_locked(profile, now);
        match &result {
            Ok((snapshot, stats)) => self.record(
                profile,
                format!(
                    "Created snapshot '{}' ({} files, {} bytes)",
                    snapshot.display_name, stats.files, stats.bytes
                ),
            ),
            Err(e) => self.record(profile, format!("Create snapshot failed: {}", e)),
        }
        result.map(|(snapshot, _)| snapshot)
    }

    fn create_locked(
        &self,
        profile: &Profile,
        now: DateTime<Local>,
    ) -> BackvaultResult<(Snapshot, CopyStats)> {
        let lock = self.storage.locks.handle(profile.id);
        let _guard = lock
            .lock()
            .map_err(|_| BackvaultError::Storage("Failed to acquire profile lock".into()))?;
        self.storage.cancel().store(false, Ordering::SeqCst);

        if !profile.source_path.is_dir() {
            return Err(BackvaultError::directory_not_found(&profile.source_path));
        }
        if !profile.backup_path.is_dir() {
            return Err(BackvaultError::directory_not_found(&profile.backup_path));
        }

        let snapshot = Snapshot::taken_at(profile.id, now);
        let target = profile.snapshot_dir(&snapshot.folder_name);

        fs::create_dir(&target).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => BackvaultError::Collision {
                entity_type: "Snapshot",
                identifier: snapshot.folder_name.clone(),
            },
            _ => BackvaultError::Io(format!("Failed to create {}: {}", target.display(), e)),
        })?;

        // A failed copy leaves the partial folder for manual cleanup and no record
        let stats = copy_tree(&profile.source_path, &target, self.copy_options())?;
        let stored = self.storage.snapshots.insert(profile, snapshot)?;

        tracing::debug!(profile = %profile.name, folder = %stored.folder_name, files = stats.files, "snapshot created");
        Ok((stored, stats))
    }

    /// Rename a snapshot
    ///
    /// Backends that keep folder names fixed only change the display name,
    /// which may be any non-blank text. Otherwise the name must be a valid
    /// folder name and the folder moves to it, with ` (n)` appended when a
    /// sibling already uses it; on failure the old name stays.
    pub fn rename(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        new_name: &str,
    ) -> BackvaultResult<Snapshot> {
        let result = self.rename_locked(profile, snapshot, new_name);
        match &result {
            Ok(renamed) => self.record(
                profile,
                format!(
                    "Renamed snapshot '{}' to '{}'",
                    snapshot.display_name, renamed.display_name
                ),
            ),
            Err(e) => self.record(
                profile,
                format!("Rename of snapshot '{}' failed: {}", snapshot.display_name, e),
            ),
        }
        result
    }

    fn rename_locked(
        &self,
        profile: &Profile,
        snapshot: &Snapshot,
        new_name: &str,
    ) -> BackvaultResult<Snapshot> {
        let lock = self.storage.locks.handle(profile.id);
        let _guard = lock
            .lock()
            .map_err(|_| BackvaultError::Storage("Failed to acquire profile lock".into()))?;

        let current = self
            .storage
            .snapshots
            .get(profile, &snapshot.folder_name)?
            .ok_or_else(|| BackvaultError::snapshot_not_found(snapshot.folder_name.clone()))?;

        match self.storage.snapshots.rename_mode() {
            RenameMode::DisplayNameOnly => {
                let name = new_name.trim();
                if name.is_empty() {
                    return Err(ValidationError::EmptyField("snapshot name").into());
                }
                self.storage.snapshots.set_display_name(profile, &current, name)
            }
            RenameMode::RenameFolder => {
                let name = validate_snapshot_name(new_name)?;
                let siblings: Vec<String> = snapshot_folders(&profile.backup_path)?
                    .into_iter()
                    .filter(|f| f != &current.folder_name)
                    .collect();
                let target_name = resolve_unique_name(&name, &siblings);
                if target_name == current.folder_name {
                    return Ok(current);
                }

                let from = profile.snapshot_dir(&current.folder_name);
                let to = profile.snapshot_dir(&target_name);
                let failed = |reason: String| BackvaultError::RenameFailed {
                    from: current.folder_name.clone(),
                    to: target_name.clone(),
                    reason,
                };

                fs::rename(&from, &to).map_err(|e| failed(e.to_string()))?;

                match self
                    .storage
                    .snapshots
                    .record_folder_rename(profile, &current, &target_name)
                {
                    Ok(renamed) => Ok(renamed),
                    Err(e) => {
                        if let Err(undo) = fs::rename(&to, &from) {
                            tracing::warn!(
                                folder = %to.display(),
                                error = %undo,
                                "could not move snapshot folder back after failed rename"
                            );
                        }
                        Err(failed(e.to_string()))
                    }
                }
            }
        }
    }

    /// Replace the profile's source directory with a snapshot's contents
    ///
    /// Destructive and not transactional: the source tree is emptied first,
    /// then the snapshot is copied in. A copy failure after the source was
    /// emptied is reported as a partial restore.
    pub fn restore(&self, profile: &Profile, snapshot: &Snapshot) -> BackvaultResult<RestoreReport> {
        let result = self.restore_locked(profile, snapshot);
        match &result {
            Ok(report) => self.record(
                profile,
                format!(
                    "Restored snapshot '{}' ({} files)",
                    snapshot.display_name, report.copied.files
                ),
            ),
            Err(e) => self.record(
                profile,
                format!("Restore of snapshot '{}' failed: {}", snapshot.display_name, e),
            ),
        }
        result
    }

    fn restore_locked(&self, profile: &Profile, snapshot: &Snapshot) -> BackvaultResult<RestoreReport> {
        let lock = self.storage.locks.handle(profile.id);
        let _guard = lock
            .lock()
            .map_err(|_| BackvaultError::Storage("Failed to acquire profile lock".into()))?;
        self.storage.cancel().store(false, Ordering::SeqCst);

        let snapshot_dir = profile.snapshot_dir(&snapshot.folder_name);
        if !snapshot_dir.is_dir() {
            return Err(BackvaultError::snapshot_not_found(snapshot.folder_name.clone()));
        }
        if !profile.source_path.is_dir() {
            return Err(BackvaultError::directory_not_found(&profile.source_path));
        }

        // Last point where a cancel leaves the source untouched
        if self.storage.cancel().swap(false, Ordering::SeqCst) {
            return Err(BackvaultError::CopyFailed("cancelled".into()));
        }
        let removed_entries = clear_directory(&profile.source_path)?;

        let copied = copy_tree(&snapshot_dir, &profile.source_path, self.copy_options()).map_err(
            |e| {
                tracing::warn!(
                    profile = %profile.name,
                    source = %profile.source_path.display(),
                    "restore copy failed after the source was cleared"
                );
                BackvaultError::PartialRestore {
                    target: profile.source_path.clone(),
                    reason: e.to_string(),
                }
            },
        )?;

        Ok(RestoreReport {
            snapshot: snapshot.clone(),
            target: profile.source_path.clone(),
            removed_entries,
            copied,
        })
    }

    /// Delete a snapshot's folder and record
    ///
    /// Returns `false` when the folder was already gone, which is not an error.
    pub fn delete_snapshot(&self, profile: &Profile, snapshot: &Snapshot) -> BackvaultResult<bool> {
        let result = self.delete_locked(profile, snapshot);
        match &result {
            Ok(true) => self.record(
                profile,
                format!("Deleted snapshot '{}'", snapshot.display_name),
            ),
            Ok(false) => self.record(
                profile,
                format!("Snapshot '{}' was already deleted", snapshot.display_name),
            ),
            Err(e) => self.record(
                profile,
                format!("Delete of snapshot '{}' failed: {}", snapshot.display_name, e),
            ),
        }
        result
    }

    fn delete_locked(&self, profile: &Profile, snapshot: &Snapshot) -> BackvaultResult<bool> {
        let lock = self.storage.locks.handle(profile.id);
        let _guard = lock
            .lock()
            .map_err(|_| BackvaultError::Storage("Failed to acquire profile lock".into()))?;

        let dir = profile.snapshot_dir(&snapshot.folder_name);
        let existed = match fs::remove_dir_all(&dir) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                return Err(BackvaultError::Io(format!(
                    "Failed to remove {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        self.storage.snapshots.remove(profile, snapshot)?;
        Ok(existed)
    }

    /// Delete every snapshot of a profile, best-effort
    ///
    /// One folder failing to delete never stops the others. The profile
    /// record itself is left to the caller.
    pub fn delete_profile_cascade(&self, profile: &Profile) -> CascadeReport {
        let lock = self.storage.locks.handle(profile.id);
        // A poisoned lock only means another operation panicked; cleanup proceeds
        let _guard = lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut report = CascadeReport::default();

        let snapshots = match self.storage.snapshots.list(profile) {
            Ok(snapshots) => snapshots,
            Err(e) => {
                report.fail(profile.backup_path.display().to_string(), e.to_string());
                Vec::new()
            }
        };

        for snapshot in &snapshots {
            let dir = profile.snapshot_dir(&snapshot.folder_name);
            match fs::remove_dir_all(&dir) {
                Ok(()) => report.removed.push(snapshot.folder_name.clone()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    report.missing.push(snapshot.folder_name.clone())
                }
                Err(e) => {
                    tracing::warn!(
                        profile = %profile.name,
                        folder = %dir.display(),
                        error = %e,
                        "could not remove snapshot folder"
                    );
                    self.record(
                        profile,
                        format!("Delete of snapshot '{}' failed: {}", snapshot.display_name, e),
                    );
                    report.fail(snapshot.folder_name.clone(), e.to_string());
                }
            }
        }

        if let Err(e) = self.storage.snapshots.remove_profile(profile) {
            tracing::warn!(profile = %profile.name, error = %e, "could not clear snapshot index");
            report.fail("snapshot index", e.to_string());
        }

        self.record(profile, format!("Deleted snapshots: {}", report.summary()));
        report
    }

    fn copy_options(&self) -> CopyOptions<'a> {
        CopyOptions {
            skip_root_entry: self.storage.snapshots.side_file(),
            cancel: Some(self.storage.cancel()),
        }
    }

    fn record(&self, profile: &Profile, message: String) {
        self.storage.activity.record(message, Some(profile));
    }
}
