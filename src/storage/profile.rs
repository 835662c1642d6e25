//! Profile and preferences documents
//!
//! Single-document stores: `profile.json` and `preferences.json`.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{UserProfile, UserSettings};

use super::file_io::{read_json, read_json_opt, write_json_atomic};

/// Store for the user's profile and preferences
pub struct ProfileStore {
    profile_path: PathBuf,
    settings_path: PathBuf,
    profile: RwLock<Option<UserProfile>>,
    settings: RwLock<UserSettings>,
}

impl ProfileStore {
    pub fn new(profile_path: PathBuf, settings_path: PathBuf) -> Self {
        Self {
            profile_path,
            settings_path,
            profile: RwLock::new(None),
            settings: RwLock::new(UserSettings::default()),
        }
    }

    /// Load both documents from disk
    pub fn load(&self) -> Result<(), SpendwiseError> {
        let profile: Option<UserProfile> = read_json_opt(&self.profile_path)?;
        let settings: UserSettings = read_json(&self.settings_path)?;

        *self.profile.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })? = profile;
        *self.settings.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })? = settings;

        Ok(())
    }

    /// The profile, if one has been created
    pub fn profile(&self) -> Result<Option<UserProfile>, SpendwiseError> {
        let profile = self.profile.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(profile.clone())
    }

    /// Replace and persist the profile
    pub fn put_profile(&self, profile: UserProfile) -> Result<(), SpendwiseError> {
        write_json_atomic(&self.profile_path, &profile)?;

        *self.profile.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })? = Some(profile);

        Ok(())
    }

    /// Current preferences (defaults when never saved)
    pub fn settings(&self) -> Result<UserSettings, SpendwiseError> {
        let settings = self.settings.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(settings.clone())
    }

    /// Replace and persist the preferences
    pub fn put_settings(&self, settings: UserSettings) -> Result<(), SpendwiseError> {
        write_json_atomic(&self.settings_path, &settings)?;

        *self.settings.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })? = settings;

        Ok(())
    }
}
