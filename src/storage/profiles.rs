//! Profile repository for JSON storage
//!
//! Manages loading and saving profiles to profiles.json. Profiles keep the
//! order they were added in.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BackvaultError;
use crate::models::{Profile, ProfileId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable profile data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ProfileData {
    profiles: Vec<Profile>,
}

/// Repository for profile persistence
pub struct ProfileRepository {
    path: PathBuf,
    data: RwLock<Vec<Profile>>,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load profiles from disk
    pub fn load(&self) -> Result<(), BackvaultError> {
        let file_data: ProfileData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.profiles;

        Ok(())
    }

    /// Save profiles to disk
    pub fn save(&self) -> Result<(), BackvaultError> {
        let data = self.data.read().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let file_data = ProfileData {
            profiles: data.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a profile by ID
    pub fn get(&self, id: ProfileId) -> Result<Option<Profile>, BackvaultError> {
        let data = self.data.read().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().find(|p| p.id == id).cloned())
    }

    /// Get all profiles in insertion order
    pub fn get_all(&self) -> Result<Vec<Profile>, BackvaultError> {
        let data = self.data.read().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Get a profile by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Profile>, BackvaultError> {
        let data = self.data.read().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let normalized = Profile::normalize_name(name);
        Ok(data
            .iter()
            .find(|p| Profile::normalize_name(&p.name) == normalized)
            .cloned())
    }

    /// Names of all profiles
    pub fn names(&self) -> Result<Vec<String>, BackvaultError> {
        let data = self.data.read().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().map(|p| p.name.clone()).collect())
    }

    /// Insert or update a profile; new profiles go to the end
    pub fn upsert(&self, profile: Profile) -> Result<(), BackvaultError> {
        let mut data = self.data.write().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => data.push(profile),
        }
        Ok(())
    }

    /// Delete a profile
    pub fn delete(&self, id: ProfileId) -> Result<bool, BackvaultError> {
        let mut data = self.data.write().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = data.len();
        data.retain(|p| p.id != id);
        Ok(data.len() != before)
    }

    /// Count profiles
    pub fn count(&self) -> Result<usize, BackvaultError> {
        let data = self.data.read().map_err(|e| {
            BackvaultError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
