//! In-process TTL cache
//!
//! Explicit cache object with get-or-refresh semantics. Entries expire after
//! the TTL given at lookup time; failed loads are never stored.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed cache whose values go stale after a caller-supplied TTL
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    /// Cached value for `key` if it is younger than `ttl`, otherwise the
    /// result of `loader`, which is stored on success.
    ///
    /// The lock is held while loading, so concurrent callers wait for one
    /// load instead of all hitting upstream.
    pub async fn get_or_refresh<F, Fut, E>(&self, key: K, ttl: Duration, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(&key) {
            if entry.stored_at.elapsed() < ttl {
                debug!("Cache hit for key: {:?}", key);
                return Ok(entry.value.clone());
            }
            debug!("Cache entry expired for key: {:?}", key);
        } else {
            debug!("Cache miss for key: {:?}", key);
        }

        let value = loader().await?;
        entries.insert(key, Entry { value: value.clone(), stored_at: Instant::now() });
        Ok(value)
    }

    /// Drop one entry; returns whether it existed
    pub async fn invalidate(&self, key: &K) -> bool {
        let removed = self.entries.lock().await.remove(key).is_some();
        debug!("Invalidated cache key: {:?} (present: {})", key, removed);
        removed
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Age of the entry stored under `key`
    pub async fn age(&self, key: &K) -> Option<Duration> {
        self.entries.lock().await.get(key).map(|entry| entry.stored_at.elapsed())
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
