//! Custom error types for backvault
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a profile draft (or a proposed snapshot name) is rejected
///
/// Validation always happens before any mutation, so these are recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was blank
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The source directory does not exist
    #[error("source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The backup root directory does not exist
    #[error("backup directory does not exist: {}", .0.display())]
    BackupRootMissing(PathBuf),

    /// Source and backup resolve to the same directory
    #[error("source and backup directories must be different")]
    PathsIdentical,

    /// One directory is nested inside the other
    #[error("source and backup directories must not be nested inside each other")]
    PathsOverlap,

    /// The directories clash with those of another profile
    #[error("backup directory overlaps a directory of profile '{0}'")]
    PathsShared(String),

    /// Another profile already uses this name
    #[error("a profile named '{0}' already exists")]
    DuplicateName(String),

    /// The name cannot be used as a snapshot folder name
    #[error("'{0}' is not a valid snapshot name")]
    InvalidSnapshotName(String),
}

/// The main error type for backvault operations
#[derive(Error, Debug)]
pub enum BackvaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for profile drafts and snapshot names
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Name already taken during create or rename
    #[error("{entity_type} already exists: {identifier}")]
    Collision {
        entity_type: &'static str,
        identifier: String,
    },

    /// Copying a directory tree into a new snapshot failed
    #[error("Copy failed: {0}")]
    CopyFailed(String),

    /// Renaming a snapshot folder failed; the original name is kept
    #[error("Rename of '{from}' to '{to}' failed: {reason}")]
    RenameFailed {
        from: String,
        to: String,
        reason: String,
    },

    /// The source tree was cleared but copying the snapshot back failed
    #[error(
        "Restore left {} in an inconsistent state and needs manual attention: {reason}",
        .target.display()
    )]
    PartialRestore { target: PathBuf, reason: String },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackvaultError {
    /// Create a "not found" error for profiles
    pub fn profile_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Profile",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for snapshots
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a directory that vanished
    pub fn directory_not_found(path: &std::path::Path) -> Self {
        Self::NotFound {
            entity_type: "Directory",
            identifier: path.display().to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a name collision
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }

    /// Check if a restore left the source tree half-written
    pub fn is_partial_restore(&self) -> bool {
        matches!(self, Self::PartialRestore { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BackvaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackvaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backvault operations
pub type BackvaultResult<T> = Result<T, BackvaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackvaultError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BackvaultError::profile_not_found("Docs");
        assert_eq!(err.to_string(), "Profile not found: Docs");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_error_wraps() {
        let err: BackvaultError = ValidationError::DuplicateName("Docs".into()).into();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation error: a profile named 'Docs' already exists"
        );
    }

    #[test]
    fn test_partial_restore_is_distinct() {
        let err = BackvaultError::PartialRestore {
            target: PathBuf::from("/src"),
            reason: "disk full".into(),
        };
        assert!(err.is_partial_restore());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackvaultError = io_err.into();
        assert!(matches!(err, BackvaultError::Io(_)));
    }
}
