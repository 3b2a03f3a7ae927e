//! Domain model types for Spotlight.
//!
//! This module defines the core types used throughout Spotlight:
//! - [`ArtistId`] - Identifier for an artist in the catalog
//! - [`Artist`] - An artist record as returned by the catalog
//! - [`ArtistEntry`] - A directory row persisted by [`crate::directory::ArtistDirectory`]
//! - [`Credentials`] - API client credentials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::secret::Secret;

/// Identifier for an artist in the catalog (e.g. `"0TnOYISbd1XYRBk9myaseg"`).
///
/// Surrounding whitespace is stripped; the catalog assigns the actual value.
///
/// # Examples
///
/// ```
/// use spotlight_core::ArtistId;
///
/// let id = ArtistId::new("  4Z8W4fKeB5YxbusRsdQVPb ");
/// assert_eq!(id.as_str(), "4Z8W4fKeB5YxbusRsdQVPb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    /// Create a new artist ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// Get the artist ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the ID is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArtistId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArtistId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// An artist record as returned by the catalog.
///
/// Only `id` and `name` are interpreted; every other field the provider
/// returns (genres, followers, images, ...) is carried verbatim in `raw`.
/// Records are transient - constructed per response and not retained by the
/// client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    /// The catalog identifier.
    pub id: ArtistId,

    /// The artist's display name.
    pub name: String,

    /// All remaining provider fields, passed through untouched.
    #[serde(flatten)]
    pub raw: serde_json::Map<String, serde_json::Value>,
}

impl Artist {
    /// The autocomplete label for this artist: `"Name (id)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// A directory row: an artist admitted to the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistEntry {
    /// The catalog identifier.
    pub id: ArtistId,

    /// The artist's name as resolved at insertion time.
    pub name: String,

    /// When the artist was added to the directory.
    pub added_at: DateTime<Utc>,
}

impl ArtistEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(id: ArtistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            added_at: Utc::now(),
        }
    }
}

/// API client credentials for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The OAuth client ID.
    pub client_id: String,

    /// The OAuth client secret.
    pub client_secret: Secret,
}

impl Credentials {
    /// Create a new credential pair.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret),
        }
    }

    /// Whether both fields are non-empty.
    ///
    /// An incomplete pair must never reach the token endpoint.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
