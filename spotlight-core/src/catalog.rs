//! Artist catalog client.
//!
//! This module provides [`CatalogClient`], the authenticated client for the
//! two catalog operations: artist lookup by ID and artist search by name.
//! Tokens come from a [`TokenSource`]; every failure is logged once here
//! with the id or query it concerns and surfaced as an [`ApiError`].

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::model::{Artist, ArtistId};
use crate::token::{AuthError, TokenSource};

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.spotify.com";

/// Maximum number of search results requested per query.
const SEARCH_LIMIT: u32 = 10;

/// Per-request timeout for catalog calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for catalog operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid access token could be obtained.
    #[error("not authenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    /// Transport failure, non-2xx response, or unusable body during a
    /// catalog call. `target` carries the artist id or query for
    /// diagnostics.
    #[error("catalog request for '{target}' failed: {message}")]
    RequestFailed { target: String, message: String },
}

/// Authenticated client for the artist catalog.
///
/// # Type Parameters
///
/// * `T` - The token source supplying bearer tokens
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use spotlight_core::{ArtistId, CatalogClient, MemoryCache, SettingsStore, TokenCache};
///
/// let settings = Arc::new(SettingsStore::load()?);
/// let catalog = CatalogClient::new(TokenCache::new(MemoryCache::new(), settings));
///
/// let artist = catalog.get_artist(&ArtistId::new("4Z8W4fKeB5YxbusRsdQVPb")).await?;
/// println!("{}", artist.name);
/// # Ok(())
/// # }
/// ```
pub struct CatalogClient<T: TokenSource> {
    tokens: T,
    http_client: reqwest::Client,
    base_url: Url,
}

impl<T: TokenSource> CatalogClient<T> {
    /// Create a new catalog client over the given token source.
    pub fn new(tokens: T) -> Self {
        Self {
            tokens,
            http_client: reqwest::Client::new(),
            base_url: Url::parse(DEFAULT_API_BASE).expect("default API base URL is valid"),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetch a single artist by catalog ID.
    ///
    /// The returned [`Artist`] carries `id` and `name` plus every other
    /// provider field in `raw`.
    pub async fn get_artist(&self, id: &ArtistId) -> Result<Artist, ApiError> {
        let token = self.tokens.get_token().await?;

        let url = self.endpoint(&format!("v1/artists/{}", id), id.as_str())?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.expose())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.request_failed(id.as_str(), e))?;

        response
            .json::<Artist>()
            .await
            .map_err(|e| self.request_failed(id.as_str(), e))
    }

    /// Search the catalog for artists matching `query`.
    ///
    /// Results come back in the provider's relevance order, at most
    /// ten of them. An empty or whitespace-only query yields an empty
    /// result without any request; so does a response lacking the
    /// `artists.items` path (the provider's "no results" shape).
    pub async fn search_artists(&self, query: &str) -> Result<Vec<Artist>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let token = self.tokens.get_token().await?;

        let url = self.endpoint("v1/search", query)?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.expose())
            .timeout(REQUEST_TIMEOUT)
            .query(&[("q", query), ("type", "artist")])
            .query(&[("limit", SEARCH_LIMIT)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.request_failed(query, e))?;

        let results = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| self.request_failed(query, e))?;

        Ok(results.artists.map(|page| page.items).unwrap_or_default())
    }

    fn endpoint(&self, path: &str, target: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| self.request_failed(target, e))
    }

    fn request_failed(&self, target: &str, err: impl std::fmt::Display) -> ApiError {
        tracing::error!("Catalog request for '{}' failed: {}", target, err);
        ApiError::RequestFailed {
            target: target.to_string(),
            message: err.to_string(),
        }
    }
}

/// Wire shape of a search response; only the artist page is interpreted.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Option<ArtistPage>,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<Artist>,
}
