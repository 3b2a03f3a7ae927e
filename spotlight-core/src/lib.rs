//! # Spotlight Core
//!
//! Core library for the Spotlight artist catalog tooling.
//!
//! This crate provides:
//! - A cached OAuth2 client-credentials token source
//! - An authenticated artist catalog client (lookup by ID, search by name)
//! - Disk-backed settings and artist directory stores
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use spotlight_core::{CatalogClient, MemoryCache, SettingsStore, TokenCache};
//!
//! async fn search(catalog: &CatalogClient<TokenCache<MemoryCache>>) {
//!     for artist in catalog.search_artists("nina simone").await.unwrap_or_default() {
//!         println!("{}", artist.label());
//!     }
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod directory;
pub mod model;
pub mod secret;
pub mod settings;
pub mod token;
pub mod token_cache;

// Re-export commonly used types at crate root
pub use model::{
    Artist,
    ArtistEntry,
    ArtistId,
    Credentials,
};

pub use secret::Secret;

pub use cache::{
    Cache,
    CacheError,
    MemoryCache,
};

pub use settings::{
    Settings,
    SettingsError,
    SettingsStore,
};

pub use token::{
    AuthError,
    CachedToken,
    TokenSource,
};

pub use token_cache::{
    TOKEN_CACHE_KEY,
    TokenCache,
};

pub use catalog::{
    ApiError,
    CatalogClient,
};

pub use directory::{
    ArtistDirectory,
    DirectoryError,
    MAX_ARTISTS,
};
