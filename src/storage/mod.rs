//! Storage layer for backvault
//!
//! Provides JSON file storage with atomic writes, the pluggable snapshot
//! stores, and the coordinator that ties them to the activity log.

pub mod file_io;
pub mod profiles;
pub mod snapshots;

pub use file_io::{read_json, read_json_optional, write_json_atomic};
pub use profiles::ProfileRepository;
pub use snapshots::{open_store, IndexedSnapshotStore, RenameMode, ScanSnapshotStore, SnapshotStore};

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::activity::ActivityLog;
use crate::backup::ProfileLocks;
use crate::config::{BackvaultPaths, Settings};
use crate::error::BackvaultError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BackvaultPaths,
    settings: Settings,
    pub profiles: ProfileRepository,
    pub snapshots: Box<dyn SnapshotStore>,
    pub activity: ActivityLog,
    pub(crate) locks: ProfileLocks,
    pub(crate) registry_lock: Mutex<()>,
    cancel: Arc<AtomicBool>,
}

impl Storage {
    /// Open storage under `paths` with the backend chosen in `settings`
    pub fn open(paths: BackvaultPaths, settings: Settings) -> Result<Self, BackvaultError> {
        paths.ensure_directories()?;

        let profiles = ProfileRepository::new(paths.profiles_file());
        profiles.load()?;

        Ok(Self {
            snapshots: open_store(settings.snapshot_backend, &paths)?,
            activity: ActivityLog::open(paths.activity_log()),
            profiles,
            locks: ProfileLocks::new(),
            registry_lock: Mutex::new(()),
            cancel: Arc::new(AtomicBool::new(false)),
            settings,
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BackvaultPaths {
        &self.paths
    }

    /// Settings this storage was opened with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared flag that cancels a running copy at the next file boundary
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub(crate) fn cancel(&self) -> &AtomicBool {
        &self.cancel
    }

    /// Check if storage has been initialized (settings were saved)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
