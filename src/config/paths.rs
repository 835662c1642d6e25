//! Path management for Spendwise
//!
//! ## Path Resolution Order
//!
//! 1. `SPENDWISE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/spendwise` on Linux)
//!
//! Every user gets an isolated directory under `users/<user-id>/`.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::SpendwiseError;
use crate::models::UserId;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "SPENDWISE_DATA_DIR";

/// Manages all paths used by Spendwise
#[derive(Debug, Clone)]
pub struct SpendwisePaths {
    /// Base directory for all Spendwise data
    base_dir: PathBuf,
}

impl SpendwisePaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SpendwiseError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create SpendwisePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the global settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Directory holding every user's collections
    pub fn users_dir(&self) -> PathBuf {
        self.base_dir.join("users")
    }

    /// Paths scoped to a single user
    pub fn for_user(&self, user: &UserId) -> UserPaths {
        UserPaths {
            dir: self.users_dir().join(user.as_str()),
        }
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), SpendwiseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SpendwiseError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if Spendwise has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Paths of one user's document collections
#[derive(Debug, Clone)]
pub struct UserPaths {
    dir: PathBuf,
}

impl UserPaths {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.dir.join("accounts.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.dir.join("transactions.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.dir.join("budgets.json")
    }

    pub fn profile_file(&self) -> PathBuf {
        self.dir.join("profile.json")
    }

    /// Per-user preferences (language, currency)
    pub fn preferences_file(&self) -> PathBuf {
        self.dir.join("preferences.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.dir.join("audit.log")
    }

    /// File locked exclusively while a process writes this user's collections
    pub fn lock_file(&self) -> PathBuf {
        self.dir.join(".lock")
    }

    pub fn ensure_directories(&self) -> Result<(), SpendwiseError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SpendwiseError::Io(format!("Failed to create user directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, SpendwiseError> {
    ProjectDirs::from("", "", "spendwise")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| SpendwiseError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_user_paths_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());

        let alice = paths.for_user(&UserId::new("alice").unwrap());
        let bob = paths.for_user(&UserId::new("bob").unwrap());

        assert_eq!(
            alice.accounts_file(),
            temp_dir.path().join("users").join("alice").join("accounts.json")
        );
        assert_ne!(alice.transactions_file(), bob.transactions_file());
        assert_eq!(bob.audit_log().parent(), Some(bob.dir()));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().join("nested"));
        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());

        let user = paths.for_user(&UserId::new("u1").unwrap());
        user.ensure_directories().unwrap();
        assert!(user.dir().exists());
    }
}
