//! Profile input validation
//!
//! Checks a profile draft before anything is written. Paths are compared in
//! their canonical absolute form, case-insensitively on platforms whose
//! default filesystems are case-insensitive.

use std::path::{Path, PathBuf};

use crate::error::ValidationError;
use crate::models::{Profile, ProfileDraft};

/// Validation rules for profile drafts
pub struct PathPolicy;

impl PathPolicy {
    /// Validate a draft against the names already in use
    ///
    /// `editing` is the current name of the profile being edited, which is
    /// allowed to be kept. Checks run in order: blank fields, missing
    /// directories, identical paths, nested paths, duplicate name.
    pub fn validate<S: AsRef<str>>(
        draft: &ProfileDraft,
        existing_names: &[S],
        editing: Option<&str>,
    ) -> Result<(), ValidationError> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if draft.source_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyField("source path"));
        }
        if draft.backup_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyField("backup path"));
        }

        if !draft.source_path.is_dir() {
            return Err(ValidationError::SourceMissing(draft.source_path.clone()));
        }
        if !draft.backup_path.is_dir() {
            return Err(ValidationError::BackupRootMissing(draft.backup_path.clone()));
        }

        let source = comparable(&draft.source_path);
        let backup = comparable(&draft.backup_path);
        if source == backup {
            return Err(ValidationError::PathsIdentical);
        }
        if nested_or_same(&source, &backup) {
            return Err(ValidationError::PathsOverlap);
        }

        let wanted = Profile::normalize_name(&draft.name);
        let own = editing.map(Profile::normalize_name);
        let taken = existing_names.iter().any(|existing| {
            let existing = Profile::normalize_name(existing.as_ref());
            existing == wanted && own.as_deref() != Some(existing.as_str())
        });
        if taken {
            return Err(ValidationError::DuplicateName(draft.name.trim().to_string()));
        }

        Ok(())
    }

    /// Reject a draft whose backup directory clashes with another profile
    ///
    /// A backup directory may not equal or nest with any other profile's
    /// backup or source directory, and the source may not lie in another
    /// profile's backup directory. Sharing a source is allowed. `others`
    /// must not contain the profile being edited.
    pub fn check_shared(draft: &ProfileDraft, others: &[Profile]) -> Result<(), ValidationError> {
        let source = comparable(&draft.source_path);
        let backup = comparable(&draft.backup_path);

        for other in others {
            let other_source = comparable(&other.source_path);
            let other_backup = comparable(&other.backup_path);
            if nested_or_same(&backup, &other_backup)
                || nested_or_same(&backup, &other_source)
                || nested_or_same(&source, &other_backup)
            {
                return Err(ValidationError::PathsShared(other.name.clone()));
            }
        }

        Ok(())
    }

    /// The draft with both paths made absolute and canonical
    pub fn normalize(draft: &ProfileDraft) -> ProfileDraft {
        ProfileDraft {
            name: draft.name.trim().to_string(),
            source_path: canonical(&draft.source_path),
            backup_path: canonical(&draft.backup_path),
        }
    }
}

fn nested_or_same(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(any(windows, target_os = "macos"))]
fn comparable(path: &Path) -> PathBuf {
    PathBuf::from(canonical(path).to_string_lossy().to_lowercase())
}

#[cfg(not(any(windows, target_os = "macos")))]
fn comparable(path: &Path) -> PathBuf {
    canonical(path)
}
