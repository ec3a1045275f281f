use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-process read cache for listing lookups
///
/// Entries are stored as serialized JSON and expire after the configured TTL.
/// Writes to the property table invalidate everything and bump the generation;
/// a value read under an older generation is never stored.
pub struct ListingCache {
    entries: moka::future::Cache<String, Vec<u8>>,
    generation: AtomicU64,
}

impl ListingCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            entries,
            generation: AtomicU64::new(0),
        }
    }

    /// Current invalidation generation; capture it before reading the backend
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Get a cached value, `None` on miss
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        match self.entries.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Store a value read at `generation`
    ///
    /// Returns `false` without caching when a write invalidated the cache in
    /// the meantime.
    pub async fn set_if_current<T>(
        &self,
        key: &str,
        value: &T,
        generation: u64,
    ) -> Result<bool, CacheError>
    where
        T: Serialize,
    {
        if self.generation() != generation {
            tracing::trace!("Cache set skipped, stale read: {}", key);
            return Ok(false);
        }
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;

        // An invalidation may have landed between the check and the insert
        if self.generation() != generation {
            self.entries.invalidate(key).await;
            return Ok(false);
        }
        tracing::trace!("Cache set: {}", key);
        Ok(true)
    }

    /// Drop every entry, e.g. after a write that may change featured listings
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.entry_count(),
            generation: self.generation(),
        }
    }
}

/// Cache statistics reported by the health endpoint
#[derive(Debug, Clone, serde::Deserialize, Serialize)]
pub struct CacheStats {
    pub entries: u64,
    pub generation: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a single listing
    pub fn property(id: i64) -> String {
        format!("property:{}", id)
    }

    /// Key for the featured listing strip
    pub fn featured(limit: usize) -> String {
        format!("featured:{}", limit)
    }
}
