//! Result caching for external lookups.
//!
//! Identical queries against the outside world (location searches,
//! segment provider calls, pedestrian routes) are collapsed through a
//! bounded TTL cache with strict least-recently-used eviction. Three
//! namespaces with independent bounds exist because their hit-rate and
//! size profiles differ: location lookups repeat constantly, route legs
//! are more varied.
//!
//! There is no single-flight de-duplication: two concurrent identical
//! misses may both run the producer. The second insert simply overwrites
//! the first.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lru::LruCache;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::Location;
use crate::providers::ProviderResponse;

/// A cached value with its expiry deadline.
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

/// Bounded key-value cache with TTL and true LRU eviction.
///
/// Entries expire individually; an expired entry is treated as absent
/// and evicted the moment a `get` observes it. When the cache is at
/// capacity, inserting evicts the entry with the oldest access time.
///
/// The mutex is only held for map operations, never across an await.
pub struct ResultCache<T> {
    name: &'static str,
    inner: Mutex<LruCache<String, CacheEntry<T>>>,
}

impl<T: Clone> ResultCache<T> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be non-zero");
        Self {
            name,
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fetch a value, refreshing its recency.
    ///
    /// An entry past its TTL is evicted as a side effect and reported
    /// as absent.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut map = self.inner.lock().unwrap();

        let expired = match map.peek(key) {
            Some(entry) => Instant::now() >= entry.expires_at,
            None => return None,
        };

        if expired {
            map.pop(key);
            return None;
        }

        // Promotes the entry to most recently used
        map.get(key).map(|entry| entry.value.clone())
    }

    /// Insert a value with the given time-to-live.
    ///
    /// At capacity, the least recently used entry is evicted first.
    pub fn insert(&self, key: String, value: T, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut map = self.inner.lock().unwrap();
        map.put(key, entry);
    }

    /// Remove an entry. Returns true if it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.inner.lock().unwrap().pop(key).is_some()
    }

    /// Drop every expired entry. Intended for periodic housekeeping.
    pub fn clear_expired(&self) {
        let now = Instant::now();
        let mut map = self.inner.lock().unwrap();

        let expired: Vec<String> = map
            .iter()
            .filter(|(_, entry)| now >= entry.expires_at)
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired {
            map.pop(&key);
        }
    }

    /// Number of stored entries, including not-yet-observed expired ones.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-through helper: return the cached value for `key`, or run
    /// `producer` and cache its successful result for `ttl`.
    ///
    /// Errors from the producer are returned as-is and never cached.
    pub async fn cached<F, Fut, E>(&self, key: String, ttl: Duration, producer: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(&key) {
            debug!(cache = self.name, key = %key, "cache hit");
            return Ok(hit);
        }
        debug!(cache = self.name, key = %key, "cache miss");

        let value = producer().await?;
        self.insert(key, value.clone(), ttl);
        Ok(value)
    }
}

/// Build a deterministic cache key from named parameters.
///
/// Pairs are sorted by name, null values dropped, strings used verbatim
/// and structured values serialized as JSON, then joined with `|`.
/// Identical logical queries produce identical keys regardless of
/// parameter order.
pub fn cache_key(params: &[(&str, Value)]) -> String {
    let mut parts: Vec<(&str, String)> = params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (*key, rendered)
        })
        .collect();

    parts.sort_by(|a, b| a.0.cmp(b.0));

    parts
        .into_iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect::<Vec<_>>()
        .join("|")
}

/// The process-wide cache namespaces.
///
/// Constructed once at startup and injected into the services that need
/// them; nothing here is a global.
pub struct CacheSet {
    /// Generic API results (segment provider responses).
    pub api: ResultCache<ProviderResponse>,

    /// Location search and hub expansion results.
    pub locations: ResultCache<Vec<Arc<Location>>>,

    /// Route leg results (pedestrian routing).
    pub routes: ResultCache<ProviderResponse>,
}

impl CacheSet {
    /// Create the namespaces with their default bounds.
    pub fn new() -> Self {
        Self::with_capacities(200, 100, 50)
    }

    /// Create the namespaces with explicit bounds (used in tests).
    pub fn with_capacities(api: usize, locations: usize, routes: usize) -> Self {
        Self {
            api: ResultCache::new("api", api),
            locations: ResultCache::new("locations", locations),
            routes: ResultCache::new("routes", routes),
        }
    }

    /// Drop expired entries in every namespace.
    pub fn clear_expired(&self) {
        self.api.clear_expired();
        self.locations.clear_expired();
        self.routes.clear_expired();
    }
}

impl Default for CacheSet {
    fn default() -> Self {
        Self::new()
    }
}
