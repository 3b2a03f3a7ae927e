//! Access token types and the token source abstraction.
//!
//! This module provides:
//! - [`CachedToken`] - A bearer token with its effective expiry
//! - [`AuthError`] - Error taxonomy for token acquisition
//! - [`TokenSource`] - Trait the catalog client depends on

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheError;
use crate::secret::Secret;
use crate::settings::SettingsError;

/// Error type for token acquisition.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client credentials are not configured (either field empty).
    ///
    /// Raised before any network call; not retried automatically.
    #[error("client credentials are not configured")]
    MissingCredentials,

    /// Transport failure or non-2xx response during the token exchange.
    #[error("token request failed: {message}")]
    RequestFailed { message: String },

    /// The token endpoint returned a payload without a usable
    /// `access_token`/`expires_in`.
    #[error("invalid token response: {message}")]
    InvalidResponse { message: String },

    /// Cache error while reading or writing the token.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Settings error while loading credentials.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// A bearer token together with its effective expiry.
///
/// The expiry safety skew is folded in when the token is created; freshness
/// is a plain comparison against the clock. Tokens are never mutated in
/// place - a refresh replaces the whole value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    /// The bearer token value.
    pub value: Secret,

    /// When this token stops being usable (provider lifetime minus skew).
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a token expiring at the given instant.
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: Secret::new(value),
            expires_at,
        }
    }

    /// Whether the token is still usable at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Source of valid bearer tokens.
///
/// The catalog client is generic over this trait so tests can substitute a
/// canned or failing source.
///
/// # Example
///
/// ```rust,ignore
/// use spotlight_core::{TokenSource, AuthError};
///
/// async fn call_api(tokens: &impl TokenSource) -> Result<(), AuthError> {
///     let token = tokens.get_token().await?;
///     // Present token.expose() as a Bearer credential
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Get a valid access token, refreshing if necessary.
    async fn get_token(&self) -> Result<Secret, AuthError>;
}
