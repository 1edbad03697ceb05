//! Path management for backvault
//!
//! Resolves where backvault keeps its own state: settings, the profile list,
//! the snapshot index and the activity log. Snapshot data itself lives under
//! each profile's backup directory, never here.
//!
//! ## Path Resolution Order
//!
//! 1. `BACKVAULT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/backvault`,
//!    `~/Library/Application Support/backvault`, `%APPDATA%\backvault`)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::BackvaultError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BACKVAULT_DATA_DIR";

/// Manages all paths used by backvault
#[derive(Debug, Clone)]
pub struct BackvaultPaths {
    /// Base directory for all backvault state
    base_dir: PathBuf,
}

impl BackvaultPaths {
    /// Create a new BackvaultPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, BackvaultError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create BackvaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the activity log
    pub fn activity_log(&self) -> PathBuf {
        self.base_dir.join("activity.log")
    }

    /// Get the path to profiles.json
    pub fn profiles_file(&self) -> PathBuf {
        self.data_dir().join("profiles.json")
    }

    /// Get the path to snapshots.json (used by the indexed snapshot backend)
    pub fn snapshot_index_file(&self) -> PathBuf {
        self.data_dir().join("snapshots.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BackvaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackvaultError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BackvaultError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if backvault has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BackvaultError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BackvaultError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("backvault"))
}
