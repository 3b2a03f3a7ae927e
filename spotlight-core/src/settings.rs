//! Settings persistence.
//!
//! Credentials live in a TOML file in the platform-specific configuration
//! directory (`~/.config/spotlight/settings.toml` on Linux,
//! `%APPDATA%\spotlight\settings.toml` on Windows), loaded once and written
//! back by the setters.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

use crate::model::Credentials;
use crate::secret::Secret;

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O error reading or writing the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML.
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serializing the settings failed.
    #[error("settings serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration directory not available.
    #[error("configuration directory not available")]
    ConfigDirUnavailable,

    /// Internal lock poisoning error.
    #[error("internal lock error: {message}")]
    Lock { message: String },
}

/// Persisted settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// OAuth client ID for the client-credentials grant.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: Secret,
}

/// Disk-backed settings store.
///
/// # Thread Safety
///
/// This implementation uses interior mutability via `RwLock` and is safe to
/// share across threads via `Arc`.
pub struct SettingsStore {
    /// Path to the settings TOML file.
    path: PathBuf,

    /// In-memory copy of the settings.
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Get the default storage path for settings.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let dirs = ProjectDirs::from("com", "spotlight", "spotlight")
            .ok_or(SettingsError::ConfigDirUnavailable)?;
        Ok(dirs.config_dir().join("settings.toml"))
    }

    /// Load the settings store from the default location.
    ///
    /// Missing files yield default (empty) settings.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from_path(Self::default_path()?)
    }

    /// Load the settings store from a specific path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn load_from_path(path: PathBuf) -> Result<Self, SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Save the current state to disk.
    fn save(&self) -> Result<(), SettingsError> {
        let data = self.data.read().map_err(|e| SettingsError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        let contents = toml::to_string_pretty(&*data)?;
        fs::write(&self.path, contents)?;

        Ok(())
    }

    /// The configured credential pair.
    ///
    /// Completeness is the caller's concern; see
    /// [`Credentials::is_complete`].
    pub fn credentials(&self) -> Result<Credentials, SettingsError> {
        let data = self.data.read().map_err(|e| SettingsError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        Ok(Credentials {
            client_id: data.client_id.clone(),
            client_secret: data.client_secret.clone(),
        })
    }

    /// Replace the stored credentials and persist.
    pub fn set_credentials(
        &self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<(), SettingsError> {
        {
            let mut data = self.data.write().map_err(|e| SettingsError::Lock {
                message: format!("write lock poisoned: {}", e),
            })?;
            data.client_id = client_id.into();
            data.client_secret = Secret::new(client_secret);
        }

        self.save()
    }

    /// The storage path for this store.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
