//! Result cache for aggregated searches.
//!
//! The cache is a performance optimization only: backend failures are logged
//! and the value is computed directly instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use moka::Expiry;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::models::SearchResultItem;

/// Key/value store with per-entry TTL, shared across requests.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Return the live value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<SearchResultItem>>, CacheError>;

    /// Store `value` under `key` for `ttl`, replacing any previous value.
    async fn set(
        &self,
        key: &str,
        value: Vec<SearchResultItem>,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

/// Return the cached value for `key`, or compute it and store it for `ttl`.
///
/// Nothing is stored when `compute` fails. Concurrent callers racing on the
/// same key may both compute; the last write wins.
pub async fn get_or_set<F, Fut, E>(
    cache: &dyn ResultCache,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<Vec<SearchResultItem>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<SearchResultItem>, E>>,
{
    match cache.get(key).await {
        Ok(Some(value)) => {
            tracing::debug!(key = %key, items = value.len(), "Cache hit");
            return Ok(value);
        }
        Ok(None) => tracing::debug!(key = %key, "Cache miss"),
        Err(e) => tracing::warn!(key = %key, error = %e, "Cache read failed, computing directly"),
    }

    let value = compute().await?;

    if let Err(e) = cache.set(key, value.clone(), ttl).await {
        tracing::warn!(key = %key, error = %e, "Cache write failed");
    }

    Ok(value)
}

/// A stored search result and its expiry time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub value: Vec<SearchResultItem>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, value: Vec<SearchResultItem>, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            key: key.into(),
            value,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time left before this entry expires (zero once expired).
    pub fn time_to_live(&self) -> Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Expires each entry at its own `expires_at`.
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.time_to_live())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.time_to_live())
    }
}

/// In-process [`ResultCache`] backed by moka.
///
/// Cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, CacheEntry>,
}

impl MemoryCache {
    /// Create a cache holding at most `max_capacity` search results.
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { inner }
    }

    /// The live entry stored under `key`, if any.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.inner
            .get(key)
            .await
            .filter(|entry| !entry.is_expired())
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<SearchResultItem>>, CacheError> {
        Ok(self.entry(key).await.map(|entry| entry.value))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<SearchResultItem>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry::new(key, value, ttl);
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }
}
