//! Time-bounded in-memory caching for computed change reports.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache behavior for one calculator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read a non-expired entry if present; otherwise compute and write.
    #[default]
    Use,
    /// User-triggered refresh: skip the read, recompute, rewrite the entry.
    Refresh,
    /// Compute without reading or writing the cache.
    Bypass,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    default_ttl: Duration,
}

impl CacheInner {
    fn new(default_ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.body.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, body: String) {
        let expires_at = Instant::now() + self.default_ttl;
        self.map.insert(key, CacheEntry { body, expires_at });
    }
}

/// Thread-safe string-body cache with elapsed-time expiry.
///
/// Entries expire by TTL only; there is no invalidation on upstream data
/// changes. An explicit user refresh goes through [`CacheMode::Refresh`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl CacheStore {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(default_ttl))),
        }
    }

    /// Cache with the standard one-hour report TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(3600))
    }

    /// Disabled cache: nothing is ever stored.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let store = self.inner.read().await;
        store.get(key)
    }

    pub async fn put(&self, key: String, body: String) {
        let mut store = self.inner.write().await;
        if store.default_ttl == Duration::ZERO {
            return;
        }
        store.put(key, body);
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_get_put_overwrite() {
        let cache = CacheStore::new(Duration::from_secs(1));

        assert!(cache.get("k").await.is_none());

        cache.put("k".to_string(), "v1".to_string()).await;
        assert_eq!(cache.get("k").await, Some("v1".to_string()));

        cache.put("k".to_string(), "v2".to_string()).await;
        assert_eq!(cache.get("k").await, Some("v2".to_string()));
    }

    #[tokio::test]
    async fn entries_expire_by_elapsed_time() {
        let cache = CacheStore::new(Duration::from_millis(50));

        cache.put("k".to_string(), "v".to_string()).await;
        assert!(cache.get("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let cache = CacheStore::with_default_ttl();

        cache.put("a".to_string(), "1".to_string()).await;
        cache.put("b".to_string(), "2".to_string()).await;
        assert_eq!(cache.len().await, 2);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache = CacheStore::disabled();

        cache.put("k".to_string(), "v".to_string()).await;
        assert!(cache.get("k").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[test]
    fn default_mode_is_use() {
        assert_eq!(CacheMode::default(), CacheMode::Use);
    }
}
