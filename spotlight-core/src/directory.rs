//! Artist directory persistence.
//!
//! This module provides disk-backed storage for the curated artist list and
//! the open-access flag, using JSON serialization and platform-specific
//! configuration directories.
//!
//! # Storage Location
//!
//! The directory is stored at `~/.config/spotlight/artists.json` on
//! Linux/macOS and `%APPDATA%\spotlight\artists.json` on Windows.
//!
//! # Example
//!
//! ```rust,ignore
//! use spotlight_core::{ArtistDirectory, ArtistEntry, ArtistId};
//!
//! let directory = ArtistDirectory::load()?;
//! directory.add(ArtistEntry::new(ArtistId::new("4Z8W4fKeB5YxbusRsdQVPb"), "Radiohead"))?;
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::model::{ArtistEntry, ArtistId};

/// Maximum number of artists the directory admits.
pub const MAX_ARTISTS: usize = 20;

/// Error type for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The artist is already in the directory.
    #[error("artist {id} is already in the directory")]
    AlreadyExists { id: String },

    /// The artist is not in the directory.
    #[error("artist {id} not found in the directory")]
    NotFound { id: String },

    /// The directory is at capacity.
    #[error("the directory is full ({limit} artists)")]
    Full { limit: usize },

    /// I/O error reading or writing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration directory not available.
    #[error("configuration directory not available")]
    ConfigDirUnavailable,

    /// Internal lock poisoning error.
    #[error("internal lock error: {message}")]
    Lock { message: String },
}

/// Internal storage format for the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DirectoryData {
    /// Version of the store format (for future migrations).
    version: u32,

    /// Whether any artist may be viewed, not just listed ones.
    #[serde(default)]
    open_access: bool,

    /// The curated artist list, in insertion order.
    artists: Vec<ArtistEntry>,
}

impl Default for DirectoryData {
    fn default() -> Self {
        Self {
            version: 1,
            open_access: false,
            artists: Vec::new(),
        }
    }
}

/// Disk-backed artist directory.
///
/// Holds a bounded, duplicate-free list of artists plus the open-access
/// flag gating lookups of unlisted artists.
///
/// # Thread Safety
///
/// This implementation uses interior mutability via `RwLock` and is safe to
/// share across threads via `Arc`.
pub struct ArtistDirectory {
    /// Path to the directory JSON file.
    path: PathBuf,

    /// In-memory cache of the directory data.
    data: Arc<RwLock<DirectoryData>>,
}

impl ArtistDirectory {
    /// Get the default storage path for the directory.
    pub fn default_path() -> Result<PathBuf, DirectoryError> {
        let dirs = directories::ProjectDirs::from("com", "spotlight", "spotlight")
            .ok_or(DirectoryError::ConfigDirUnavailable)?;
        Ok(dirs.config_dir().join("artists.json"))
    }

    /// Load the directory from the default location.
    ///
    /// Creates the file and parent directories if they don't exist.
    pub fn load() -> Result<Self, DirectoryError> {
        Self::load_from_path(Self::default_path()?)
    }

    /// Load the directory from a specific path.
    ///
    /// Creates parent directories if they don't exist; a missing file
    /// yields an empty directory with open access off.
    pub fn load_from_path(path: PathBuf) -> Result<Self, DirectoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            DirectoryData::default()
        };

        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Save the current state to disk.
    fn save(&self) -> Result<(), DirectoryError> {
        let data = self.data.read().map_err(|e| DirectoryError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        let contents = serde_json::to_string_pretty(&*data)?;
        fs::write(&self.path, contents)?;

        Ok(())
    }

    /// Add an artist to the directory.
    ///
    /// Rejects duplicates and enforces the [`MAX_ARTISTS`] cap.
    pub fn add(&self, entry: ArtistEntry) -> Result<(), DirectoryError> {
        {
            let mut data = self.data.write().map_err(|e| DirectoryError::Lock {
                message: format!("write lock poisoned: {}", e),
            })?;

            if data.artists.len() >= MAX_ARTISTS {
                return Err(DirectoryError::Full { limit: MAX_ARTISTS });
            }

            if data.artists.iter().any(|a| a.id == entry.id) {
                return Err(DirectoryError::AlreadyExists {
                    id: entry.id.to_string(),
                });
            }

            data.artists.push(entry);
        }

        self.save()
    }

    /// Remove an artist from the directory.
    ///
    /// Returns an error if the artist isn't listed.
    pub fn remove(&self, id: &ArtistId) -> Result<(), DirectoryError> {
        {
            let mut data = self.data.write().map_err(|e| DirectoryError::Lock {
                message: format!("write lock poisoned: {}", e),
            })?;

            let initial_len = data.artists.len();
            data.artists.retain(|a| &a.id != id);

            if data.artists.len() == initial_len {
                return Err(DirectoryError::NotFound { id: id.to_string() });
            }
        }

        self.save()
    }

    /// Get a listed artist by ID.
    ///
    /// Returns `Ok(None)` if the artist isn't listed.
    pub fn get(&self, id: &ArtistId) -> Result<Option<ArtistEntry>, DirectoryError> {
        let data = self.data.read().map_err(|e| DirectoryError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        Ok(data.artists.iter().find(|a| &a.id == id).cloned())
    }

    /// List all artists, in insertion order.
    pub fn list(&self) -> Result<Vec<ArtistEntry>, DirectoryError> {
        let data = self.data.read().map_err(|e| DirectoryError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        Ok(data.artists.clone())
    }

    /// Number of listed artists.
    pub fn len(&self) -> Result<usize, DirectoryError> {
        let data = self.data.read().map_err(|e| DirectoryError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        Ok(data.artists.len())
    }

    /// Whether the directory has no artists.
    pub fn is_empty(&self) -> Result<bool, DirectoryError> {
        Ok(self.len()? == 0)
    }

    /// The open-access flag.
    pub fn open_access(&self) -> Result<bool, DirectoryError> {
        let data = self.data.read().map_err(|e| DirectoryError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        Ok(data.open_access)
    }

    /// Set the open-access flag and persist.
    pub fn set_open_access(&self, open_access: bool) -> Result<(), DirectoryError> {
        {
            let mut data = self.data.write().map_err(|e| DirectoryError::Lock {
                message: format!("write lock poisoned: {}", e),
            })?;
            data.open_access = open_access;
        }

        self.save()
    }

    /// Whether an artist may be viewed: open access, or listed.
    pub fn is_visible(&self, id: &ArtistId) -> Result<bool, DirectoryError> {
        let data = self.data.read().map_err(|e| DirectoryError::Lock {
            message: format!("read lock poisoned: {}", e),
        })?;

        Ok(data.open_access || data.artists.iter().any(|a| &a.id == id))
    }

    /// The storage path for this directory.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
