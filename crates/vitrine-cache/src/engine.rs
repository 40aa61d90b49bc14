//! Response cache engine - TTL bookkeeping over a storage backend

use crate::cache::{CacheStats, CachedResponse};
use crate::config::{CacheConfig, StorageBackend};
use crate::storage::memory::MemoryStorage;
use crate::storage::Storage;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Build the cache key for a request: the URL followed by its sorted options.
///
/// ```
/// use vitrine_cache::cache_key;
///
/// assert_eq!(cache_key("/products", &[("limit", "8"), ("section", "Sale")]),
///            cache_key("/products", &[("section", "Sale"), ("limit", "8")]));
/// assert_eq!(cache_key("/brands/public", &[]), "/brands/public");
/// ```
pub fn cache_key(url: &str, options: &[(&str, &str)]) -> String {
    if options.is_empty() {
        return url.to_string();
    }

    let mut pairs: Vec<String> = options
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    pairs.sort();

    format!("{}|{}", url, pairs.join("&"))
}

/// Check whether a URL carries the cache-busting query parameter.
///
/// ```
/// use vitrine_cache::is_cache_busting;
///
/// assert!(is_cache_busting("/sections?_t=123", "_t"));
/// assert!(is_cache_busting("/sections?a=1&_t", "_t"));
/// assert!(!is_cache_busting("/sections?_tx=1", "_t"));
/// assert!(!is_cache_busting("/sections", "_t"));
/// ```
pub fn is_cache_busting(url: &str, bust_param: &str) -> bool {
    let Some((_, query)) = url.split_once('?') else {
        return false;
    };

    query
        .split('&')
        .map(|pair| pair.split_once('=').map(|(k, _)| k).unwrap_or(pair))
        .any(|key| key == bust_param)
}

/// Shared response cache injected into every resolver of a page session.
/// Clones share storage and stats.
#[derive(Clone)]
pub struct ResponseCache {
    config: CacheConfig,
    storage: Arc<dyn Storage>,
    stats: Arc<RwLock<CacheStats>>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        let storage: Arc<dyn Storage> = match config.storage {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Self::with_storage(config, storage)
    }

    /// Create a cache over an explicit storage backend
    pub fn with_storage(config: CacheConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            storage,
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }

    pub fn bust_param(&self) -> &str {
        &self.config.bust_param
    }

    /// Get a fresh cached value. Expired entries are evicted and count as misses.
    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match self.storage.get(key).await? {
            Some(mut entry) if entry.is_fresh() => {
                entry.record_hit();
                let body = entry.body.clone();
                self.storage.set(key, entry).await?;
                self.stats.write().await.hits += 1;
                Ok(Some(body))
            }
            Some(_) => {
                self.storage.delete(key).await?;
                let mut stats = self.stats.write().await;
                stats.expired += 1;
                stats.misses += 1;
                debug!(key, "cache entry expired");
                Ok(None)
            }
            None => {
                self.stats.write().await.misses += 1;
                Ok(None)
            }
        }
    }

    /// Store a value for `ttl`
    pub async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        self.storage.set(key, CachedResponse::new(value, ttl)).await
    }

    /// Return the cached value for `url + options`, or run `fetch` and store its result.
    ///
    /// URLs carrying the bust parameter always run `fetch` and never populate the cache.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        url: &str,
        options: &[(&str, &str)],
        fetch: F,
    ) -> std::result::Result<serde_json::Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<serde_json::Value, E>>,
    {
        if is_cache_busting(url, &self.config.bust_param) {
            self.stats.write().await.bypassed += 1;
            return fetch().await;
        }

        let key = cache_key(url, options);
        if let Ok(Some(value)) = self.get(&key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        if let Err(e) = self.set(&key, value.clone(), self.config.default_ttl).await {
            debug!(key, error = %e, "failed to populate cache");
        }
        Ok(value)
    }

    pub async fn invalidate(&self, key: &str) -> Result<()> {
        self.storage.delete(key).await
    }

    /// Clear all entries and reset statistics
    pub async fn clear(&self) -> Result<()> {
        self.storage.clear().await?;
        *self.stats.write().await = CacheStats::default();
        Ok(())
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        self.storage.keys().await
    }

    pub fn storage_name(&self) -> &'static str {
        self.storage.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> ResponseCache {
        ResponseCache::new(CacheConfig::default())
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = cache();
        cache
            .set("k", serde_json::json!({"a": 1}), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(serde_json::json!({"a": 1})));
        assert_eq!(cache.get("missing").await.unwrap(), None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let cache = cache();
        cache
            .set("k", serde_json::json!(1), Duration::from_secs(0))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.keys().await.unwrap().is_empty());
        assert_eq!(cache.stats().await.expired, 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_is_idempotent_within_ttl() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(serde_json::json!(["a", "b"]))
        };

        let first = cache.get_or_fetch("/categories", &[], fetch).await.unwrap();
        let second = cache.get_or_fetch("/categories", &[], fetch).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bust_param_bypasses_and_does_not_populate() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(serde_json::json!(1))
        };

        cache.get_or_fetch("/sections?_t=1", &[], fetch).await.unwrap();
        cache.get_or_fetch("/sections?_t=1", &[], fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.keys().await.unwrap().is_empty());
        assert_eq!(cache.stats().await.bypassed, 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = cache();

        let result = cache
            .get_or_fetch("/banners", &[], || async { Err::<serde_json::Value, _>("down") })
            .await;

        assert_eq!(result, Err("down"));
        assert!(cache.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_are_not_coalesced() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, ()>(serde_json::json!("x"))
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch("/brands/public", &[], fetch),
            cache.get_or_fetch("/brands/public", &[], fetch),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_resets_stats() {
        let cache = cache();
        cache.set("k", serde_json::json!(1), Duration::from_secs(60)).await.unwrap();
        cache.get("k").await.unwrap();

        cache.clear().await.unwrap();

        assert_eq!(cache.stats().await, CacheStats::default());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_storage_and_stats() {
        let cache = cache();
        let handle = cache.clone();

        handle.set("k", serde_json::json!(1), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(serde_json::json!(1)));
        assert_eq!(handle.stats().await.hits, 1);
    }
}
