//! Client-credentials token cache.
//!
//! This module provides [`TokenCache`], the default [`TokenSource`]
//! implementation. It keeps a single bearer token in a pluggable
//! [`Cache`] backend and refreshes it through the OAuth2
//! client-credentials grant when absent or expired.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use spotlight_core::{MemoryCache, SettingsStore, TokenCache, TokenSource};
//!
//! let settings = Arc::new(SettingsStore::load()?);
//! let tokens = TokenCache::new(MemoryCache::new(), settings);
//!
//! let token = tokens.get_token().await?;
//! println!("Bearer {}", token.expose());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, RequestTokenError, TokenResponse, TokenUrl,
    basic::BasicClient, reqwest::async_http_client,
};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, CacheError};
use crate::secret::Secret;
use crate::settings::SettingsStore;
use crate::token::{AuthError, CachedToken, TokenSource};

/// Cache key under which the access token lives.
pub const TOKEN_CACHE_KEY: &str = "spotlight/access_token";

/// Default token endpoint for the client-credentials exchange.
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Authorization endpoint; unused by the client-credentials grant but
/// required by the OAuth2 client constructor.
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Default expiry skew in seconds.
///
/// Subtracted from the provider's reported lifetime so a token is never
/// presented right as it expires mid-request.
const DEFAULT_SKEW_SECS: i64 = 10;

/// Caching token source backed by the client-credentials grant.
///
/// Each call performs one cache read, at most one outbound token request,
/// and at most one cache write. Concurrent refreshes are tolerated; the
/// worst case under a race is a redundant token fetch, never a torn cache
/// entry.
///
/// # Type Parameters
///
/// * `C` - The cache backend to keep the token in
pub struct TokenCache<C: Cache> {
    cache: C,
    settings: Arc<SettingsStore>,
    token_url: String,
    skew: chrono::Duration,
}

impl<C: Cache> TokenCache<C> {
    /// Create a new token cache over the given backend and settings.
    ///
    /// Uses the default token endpoint and a 10-second expiry skew.
    pub fn new(cache: C, settings: Arc<SettingsStore>) -> Self {
        Self {
            cache,
            settings,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            skew: chrono::Duration::seconds(DEFAULT_SKEW_SECS),
        }
    }

    /// Override the token endpoint URL.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the expiry skew.
    pub fn with_skew_secs(mut self, secs: i64) -> Self {
        self.skew = chrono::Duration::seconds(secs);
        self
    }

    /// Read the cached token, treating undecodable entries as a miss.
    async fn read_cached(&self) -> Result<Option<CachedToken>, AuthError> {
        let Some(value) = self.cache.get(TOKEN_CACHE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                tracing::debug!("Discarding undecodable cached token: {}", e);
                Ok(None)
            }
        }
    }

    /// Exchange client credentials for a fresh token and cache it.
    async fn fetch_token(&self) -> Result<CachedToken, AuthError> {
        let credentials = self.settings.credentials()?;
        if !credentials.is_complete() {
            return Err(AuthError::MissingCredentials);
        }

        let auth_url =
            AuthUrl::new(DEFAULT_AUTH_URL.to_string()).map_err(|e| AuthError::RequestFailed {
                message: format!("invalid auth URL: {}", e),
            })?;
        let token_url =
            TokenUrl::new(self.token_url.clone()).map_err(|e| AuthError::RequestFailed {
                message: format!("invalid token URL: {}", e),
            })?;

        let client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(
                credentials.client_secret.expose().to_string(),
            )),
            auth_url,
            Some(token_url),
        );

        let response = client
            .exchange_client_credentials()
            .request_async(async_http_client)
            .await
            .map_err(|e| match e {
                RequestTokenError::Parse(err, _) => AuthError::InvalidResponse {
                    message: format!("token payload did not parse: {}", err),
                },
                other => AuthError::RequestFailed {
                    message: other.to_string(),
                },
            })?;

        let access_token = response.access_token().secret();
        if access_token.is_empty() {
            return Err(AuthError::InvalidResponse {
                message: "empty access_token".to_string(),
            });
        }

        let expires_in = response
            .expires_in()
            .ok_or_else(|| AuthError::InvalidResponse {
                message: "missing expires_in".to_string(),
            })?;
        let lifetime =
            chrono::Duration::from_std(expires_in).map_err(|e| AuthError::InvalidResponse {
                message: format!("expires_in out of range: {}", e),
            })?;

        // Skew folds into the expiry once, here. A lifetime shorter than the
        // skew yields a token that is only good for the current caller.
        let effective = lifetime - self.skew;
        let token = CachedToken::new(access_token.clone(), Utc::now() + effective);

        let ttl = effective.to_std().unwrap_or(Duration::ZERO);
        let value = serde_json::to_value(&token).map_err(CacheError::from)?;
        self.cache.set(TOKEN_CACHE_KEY, value, ttl).await?;

        tracing::info!("Fetched new access token, valid for {}s", effective.num_seconds());

        Ok(token)
    }
}

#[async_trait]
impl<C: Cache + 'static> TokenSource for TokenCache<C> {
    async fn get_token(&self) -> Result<Secret, AuthError> {
        if let Some(token) = self.read_cached().await? {
            if token.is_fresh(Utc::now()) {
                tracing::debug!("Using cached access token");
                return Ok(token.value);
            }
        }

        match self.fetch_token().await {
            Ok(token) => Ok(token.value),
            Err(AuthError::MissingCredentials) => Err(AuthError::MissingCredentials),
            Err(e) => {
                tracing::error!("Failed to obtain access token: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use tempfile::TempDir;

    fn test_settings(client_id: &str, client_secret: &str) -> (Arc<SettingsStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        let store = SettingsStore::load_from_path(path).unwrap();
        store.set_credentials(client_id, client_secret).unwrap();
        (Arc::new(store), temp_dir)
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuits() {
        let (settings, _temp) = test_settings("", "");
        let tokens = TokenCache::new(MemoryCache::new(), settings);

        let result = tokens.get_token().await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_partial_credentials_short_circuit() {
        let (settings, _temp) = test_settings("only-an-id", "");
        let tokens = TokenCache::new(MemoryCache::new(), settings);

        let result = tokens.get_token().await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_fresh_cached_token_is_returned_without_refresh() {
        let (settings, _temp) = test_settings("", "");
        let cache = MemoryCache::new();

        // Seed a fresh token. Credentials are deliberately empty: a cache
        // hit must not consult them.
        let token = CachedToken::new("seeded-token", Utc::now() + chrono::Duration::hours(1));
        cache
            .set(
                TOKEN_CACHE_KEY,
                serde_json::to_value(&token).unwrap(),
                Duration::from_secs(3600),
            )
            .await
            .unwrap();

        let tokens = TokenCache::new(cache, settings);
        let result = tokens.get_token().await.unwrap();
        assert_eq!(result.expose(), "seeded-token");
    }

    #[tokio::test]
    async fn test_stale_cached_token_triggers_refresh_path() {
        let (settings, _temp) = test_settings("", "");
        let cache = MemoryCache::new();

        let token = CachedToken::new("stale-token", Utc::now() - chrono::Duration::seconds(1));
        cache
            .set(
                TOKEN_CACHE_KEY,
                serde_json::to_value(&token).unwrap(),
                Duration::from_secs(3600),
            )
            .await
            .unwrap();

        // The refresh path hits the credential check first.
        let tokens = TokenCache::new(cache, settings);
        let result = tokens.get_token().await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let (settings, _temp) = test_settings("", "");
        let cache = MemoryCache::new();
        cache
            .set(
                TOKEN_CACHE_KEY,
                serde_json::json!("not a token"),
                Duration::from_secs(3600),
            )
            .await
            .unwrap();

        let tokens = TokenCache::new(cache, settings);
        let result = tokens.get_token().await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }
}
