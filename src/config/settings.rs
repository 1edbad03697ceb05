//! User settings for backvault
//!
//! Selects the snapshot persistence backend and the confirmation policy for
//! destructive commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::paths::BackvaultPaths;
use crate::error::BackvaultError;

/// Which snapshot store backs the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotBackend {
    /// A JSON index in the data directory is the list of snapshots
    #[default]
    Indexed,
    /// Snapshots are whatever folders exist under the backup directory
    Scan,
}

impl SnapshotBackend {
    /// Parse a backend name from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "indexed" | "index" | "json" => Some(Self::Indexed),
            "scan" | "folder" | "filesystem" => Some(Self::Scan),
            _ => None,
        }
    }
}

impl fmt::Display for SnapshotBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed => write!(f, "indexed"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

/// User settings for backvault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Snapshot persistence backend
    #[serde(default)]
    pub snapshot_backend: SnapshotBackend,

    /// Whether restore and profile deletion require `--force`
    #[serde(default = "default_confirm_destructive")]
    pub confirm_destructive: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_confirm_destructive() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            snapshot_backend: SnapshotBackend::default(),
            confirm_destructive: default_confirm_destructive(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BackvaultPaths) -> Result<Self, BackvaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackvaultError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackvaultError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackvaultPaths) -> Result<(), BackvaultError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackvaultError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            BackvaultError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
