//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use super::{Cache, CacheError};

struct StoredEntry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// In-process cache for single-binary deployments and tests.
///
/// Entries live until their TTL lapses or the process exits. Expiry is
/// enforced at read time; an expired entry reads as absent and is dropped
/// on the next write to the same key.
///
/// # Thread Safety
///
/// This implementation uses interior mutability via `RwLock` and is
/// safe to share across threads.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryCache {
    /// Create a new empty memory cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().map(|e| e.len()).unwrap_or(0);
        f.debug_struct("MemoryCache")
            .field("entries_count", &count)
            .finish()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let entries = self.entries.read().map_err(|e| CacheError::Backend {
            message: format!("lock poisoned: {}", e),
        })?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let lifetime = chrono::Duration::from_std(ttl).map_err(|e| CacheError::Backend {
            message: format!("ttl out of range: {}", e),
        })?;
        let mut entries = self.entries.write().map_err(|e| CacheError::Backend {
            message: format!("lock poisoned: {}", e),
        })?;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: Utc::now() + lifetime,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| CacheError::Backend {
            message: format!("lock poisoned: {}", e),
        })?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_set_get() {
        let cache = MemoryCache::new();
        let value = serde_json::json!({"token": "abc"});

        cache
            .set("test-key", value.clone(), Duration::from_secs(60))
            .await
            .unwrap();
        let retrieved = cache.get("test-key").await.unwrap();

        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_memory_cache_get_nonexistent() {
        let cache = MemoryCache::new();
        let result = cache.get("nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_zero_ttl_reads_as_absent() {
        let cache = MemoryCache::new();
        cache
            .set("test-key", serde_json::json!(1), Duration::ZERO)
            .await
            .unwrap();

        let result = cache.get("test-key").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_delete() {
        let cache = MemoryCache::new();
        cache
            .set("test-key", serde_json::json!(1), Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete("test-key").await.unwrap();

        let result = cache.get("test-key").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_overwrite_replaces_entry() {
        let cache = MemoryCache::new();
        cache
            .set("test-key", serde_json::json!("old"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("test-key", serde_json::json!("new"), Duration::from_secs(60))
            .await
            .unwrap();

        let result = cache.get("test-key").await.unwrap();
        assert_eq!(result, Some(serde_json::json!("new")));
    }
}
