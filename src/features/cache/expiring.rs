//! Bounded LRU cache with per-entry TTL.
//!
//! Expiry is lazy: every `get` and `set` first purges all entries older than the TTL,
//! so no sweeper task is needed. Capacity eviction is by true recency (reads promote).
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Generic keys, purge the whole store on every access
//! - 1.0.0: Initial release for translation results

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

pub struct ExpiringCache<K, V> {
    inner: Mutex<LruCache<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries (zero is treated as one).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a value, promoting it to most-recently-used on hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock();
        self.purge_expired(&mut cache);
        cache.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key`.
    ///
    /// When the store is full and `key` is new, the least-recently-used entry is evicted.
    pub fn set(&self, key: K, value: V) {
        let mut cache = self.inner.lock();
        self.purge_expired(&mut cache);
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        if let Some((evicted, _)) = cache.push(key.clone(), entry) {
            if evicted != key {
                debug!("Cache full ({} entries), evicted least recently used entry", cache.len());
            }
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let mut cache = self.inner.lock();
        self.purge_expired(&mut cache);
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired(&self, cache: &mut LruCache<K, CacheEntry<V>>) {
        let now = Instant::now();
        let expired: Vec<K> = cache
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.stored_at) > self.ttl)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            cache.pop(key);
        }
        if !expired.is_empty() {
            debug!("Purged {} expired cache entries", expired.len());
        }
    }
}
