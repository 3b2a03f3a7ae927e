//! Volatile cache abstraction.
//!
//! This module provides:
//! - [`Cache`] - Trait for TTL'd key-value cache backends
//! - [`MemoryCache`] - In-process implementation
//!
//! The token cache stores its single entry here under a fixed namespaced
//! key; the backend decides nothing about the payload beyond holding it
//! until the TTL lapses. Entries are replaced wholesale - a reader sees
//! either the previous value or the fully written new one, never a mix.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

mod memory;

pub use memory::MemoryCache;

/// Error type for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage backend encountered an error.
    #[error("cache backend error: {message}")]
    Backend { message: String },

    /// Serialization or deserialization of a cached value failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Abstraction over volatile key-value cache backends with per-entry expiry.
///
/// Implementations must make `set` atomic from a reader's perspective.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist or its TTL has lapsed.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Store a value at the given key with a time-to-live.
    ///
    /// Overwrites any existing value.
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration)
        -> Result<(), CacheError>;

    /// Delete a value by key.
    ///
    /// Returns `Ok(())` even if the key didn't exist.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
