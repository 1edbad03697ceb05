//! Profile model
//!
//! A profile is a named binding between a source directory and the directory
//! its snapshots are stored in.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProfileId;

/// A backup profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier
    pub id: ProfileId,

    /// Profile name, unique across profiles (case-insensitive)
    pub name: String,

    /// Directory that gets snapshotted
    pub source_path: PathBuf,

    /// Directory snapshots are written into
    pub backup_path: PathBuf,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last modified
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new profile from already-validated values
    pub fn new(name: impl Into<String>, source_path: PathBuf, backup_path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            name: name.into(),
            source_path,
            backup_path,
            created_at: now,
            updated_at: now,
        }
    }

    /// Absolute path of one of this profile's snapshot folders
    pub fn snapshot_dir(&self, folder_name: &str) -> PathBuf {
        self.backup_path.join(folder_name)
    }

    /// Apply an edited draft in place
    pub fn apply(&mut self, draft: &ProfileDraft) {
        self.name = draft.name.clone();
        self.source_path = draft.source_path.clone();
        self.backup_path = draft.backup_path.clone();
        self.updated_at = Utc::now();
    }

    /// Normalize a profile name for case-insensitive comparison
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {})",
            self.name,
            self.source_path.display(),
            self.backup_path.display()
        )
    }
}

/// User input for creating or editing a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub source_path: PathBuf,
    pub backup_path: PathBuf,
}

impl ProfileDraft {
    /// Build a draft, trimming surrounding whitespace from every field
    pub fn new(
        name: impl AsRef<str>,
        source_path: impl AsRef<Path>,
        backup_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            source_path: trim_path(source_path.as_ref()),
            backup_path: trim_path(backup_path.as_ref()),
        }
    }

    /// Start a draft from an existing profile (for edits)
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            source_path: profile.source_path.clone(),
            backup_path: profile.backup_path.clone(),
        }
    }
}

fn trim_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(s.trim()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_trims_fields() {
        let draft = ProfileDraft::new("  Docs ", " /tmp/src ", "/tmp/bk\t");
        assert_eq!(draft.name, "Docs");
        assert_eq!(draft.source_path, PathBuf::from("/tmp/src"));
        assert_eq!(draft.backup_path, PathBuf::from("/tmp/bk"));
    }

    #[test]
    fn test_apply_updates_fields() {
        let mut profile = Profile::new("Docs", "/a".into(), "/b".into());
        let created = profile.created_at;
        profile.apply(&ProfileDraft::new("Photos", "/c", "/d"));

        assert_eq!(profile.name, "Photos");
        assert_eq!(profile.source_path, PathBuf::from("/c"));
        assert_eq!(profile.backup_path, PathBuf::from("/d"));
        assert_eq!(profile.created_at, created);
    }

    #[test]
    fn test_snapshot_dir() {
        let profile = Profile::new("Docs", "/src".into(), "/bk".into());
        assert_eq!(
            profile.snapshot_dir("2025-01-02_030405"),
            PathBuf::from("/bk/2025-01-02_030405")
        );
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(Profile::normalize_name(" My Docs "), "my docs");
    }
}
