//! Profile service
//!
//! Provides business logic for profile management: validated add and edit,
//! cascading delete, and lookup by name or ID.

use std::sync::MutexGuard;

use crate::backup::{BackupEngine, CascadeReport};
use crate::error::{BackvaultError, BackvaultResult};
use crate::models::{Profile, ProfileDraft, ProfileId};
use crate::storage::Storage;

use super::path_policy::PathPolicy;

/// Service for profile management
pub struct ProfileRegistry<'a> {
    storage: &'a Storage,
}

impl<'a> ProfileRegistry<'a> {
    /// Create a new profile registry
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new profile from a draft
    pub fn add(&self, draft: &ProfileDraft) -> BackvaultResult<Profile> {
        let result = self.add_locked(draft);
        match &result {
            Ok(profile) => self.storage.activity.record(
                format!("Created profile '{}'", profile.name),
                Some(profile),
            ),
            Err(e) => self.storage.activity.record(
                format!("Adding profile '{}' failed: {}", draft.name.trim(), e),
                None,
            ),
        };
        result
    }

    fn add_locked(&self, draft: &ProfileDraft) -> BackvaultResult<Profile> {
        let _guard = self.lock()?;

        let names = self.storage.profiles.names()?;
        PathPolicy::validate(draft, &names, None)?;
        PathPolicy::check_shared(draft, &self.storage.profiles.get_all()?)?;
        let draft = PathPolicy::normalize(draft);

        let profile = Profile::new(draft.name, draft.source_path, draft.backup_path);
        self.storage.profiles.upsert(profile.clone())?;
        self.storage.profiles.save()?;

        Ok(profile)
    }

    /// Update a profile's name and paths
    ///
    /// Existing snapshots stay where they are; they are only listed under
    /// the new backup directory if they are moved there.
    pub fn edit(&self, id: ProfileId, draft: &ProfileDraft) -> BackvaultResult<Profile> {
        let before = self.get(id)?;
        let result = self.edit_locked(id, draft);
        match (&result, &before) {
            (Ok(profile), Some(before)) if before.name != profile.name => {
                self.storage.activity.record(
                    format!("Renamed profile '{}' to '{}'", before.name, profile.name),
                    Some(profile),
                )
            }
            (Ok(profile), _) => self
                .storage
                .activity
                .record(format!("Updated profile '{}'", profile.name), Some(profile)),
            (Err(e), before) => self.storage.activity.record(
                format!("Editing profile failed: {}", e),
                before.as_ref(),
            ),
        };
        result
    }

    fn edit_locked(&self, id: ProfileId, draft: &ProfileDraft) -> BackvaultResult<Profile> {
        let _guard = self.lock()?;

        let mut profile = self
            .storage
            .profiles
            .get(id)?
            .ok_or_else(|| BackvaultError::profile_not_found(id.to_string()))?;

        let names = self.storage.profiles.names()?;
        PathPolicy::validate(draft, &names, Some(profile.name.as_str()))?;
        let others: Vec<Profile> = self
            .storage
            .profiles
            .get_all()?
            .into_iter()
            .filter(|p| p.id != id)
            .collect();
        PathPolicy::check_shared(draft, &others)?;
        profile.apply(&PathPolicy::normalize(draft));

        self.storage.profiles.upsert(profile.clone())?;
        self.storage.profiles.save()?;

        Ok(profile)
    }

    /// Delete a profile and all of its snapshots
    ///
    /// Snapshot removal is best-effort; the profile record is removed even
    /// when some folders could not be deleted. The report says which.
    pub fn delete(&self, id: ProfileId) -> BackvaultResult<CascadeReport> {
        let _guard = self.lock()?;

        let profile = match self.storage.profiles.get(id)? {
            Some(profile) => profile,
            None => {
                let err = BackvaultError::profile_not_found(id.to_string());
                self.storage
                    .activity
                    .record(format!("Deleting profile failed: {}", err), None);
                return Err(err);
            }
        };

        let report = BackupEngine::new(self.storage).delete_profile_cascade(&profile);
        if !report.is_clean() {
            tracing::warn!(profile = %profile.name, "{}", report.summary());
        }

        let removed = self
            .storage
            .profiles
            .delete(id)
            .and_then(|_| self.storage.profiles.save());
        match &removed {
            Ok(()) => self
                .storage
                .activity
                .record(format!("Deleted profile '{}'", profile.name), Some(&profile)),
            Err(e) => self.storage.activity.record(
                format!("Deleting profile '{}' failed: {}", profile.name, e),
                Some(&profile),
            ),
        };
        removed?;

        self.storage.locks.forget(id);
        Ok(report)
    }

    /// All profiles in the order they were added
    pub fn list(&self) -> BackvaultResult<Vec<Profile>> {
        self.storage.profiles.get_all()
    }

    /// Get a profile by ID
    pub fn get(&self, id: ProfileId) -> BackvaultResult<Option<Profile>> {
        self.storage.profiles.get(id)
    }

    /// Find a profile by name (case-insensitive) or ID, full or short form
    pub fn find(&self, identifier: &str) -> BackvaultResult<Option<Profile>> {
        if let Some(profile) = self.storage.profiles.get_by_name(identifier)? {
            return Ok(Some(profile));
        }

        Ok(self
            .storage
            .profiles
            .get_all()?
            .into_iter()
            .find(|p| p.id.matches(identifier)))
    }

    /// Like `find`, but a missing profile is an error
    pub fn require(&self, identifier: &str) -> BackvaultResult<Profile> {
        self.find(identifier)?
            .ok_or_else(|| BackvaultError::profile_not_found(identifier))
    }

    fn lock(&self) -> BackvaultResult<MutexGuard<'a, ()>> {
        self.storage
            .registry_lock
            .lock()
            .map_err(|_| BackvaultError::Storage("Failed to acquire registry lock".into()))
    }
}
