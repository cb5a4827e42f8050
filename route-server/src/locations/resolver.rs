//! Location resolution.
//!
//! The resolver sits between free-text queries and the routing engine:
//! it searches for locations (live provider first, builtin dataset as
//! fallback), expands cities into their nearby transport hubs, and
//! keeps an id index so repeat lookups skip the search path entirely.
//! Resolution never errors; a failed upstream degrades to the builtin
//! dataset.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{CacheSet, cache_key};
use crate::domain::{Location, LocationKind};

use super::client::LocationSearchProvider;
use super::dataset;

/// TTL for free-text search results.
const SEARCH_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for nearby-hub expansions.
const HUBS_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Default cap on hubs returned per city.
const DEFAULT_MAX_HUBS: usize = 3;

/// Resolves queries and ids to canonical locations.
pub struct LocationResolver {
    provider: Arc<dyn LocationSearchProvider>,
    caches: Arc<CacheSet>,
    index: RwLock<HashMap<String, Arc<Location>>>,
    max_hubs: usize,
}

impl LocationResolver {
    /// Create a resolver with the id index pre-seeded from the builtin
    /// dataset.
    pub fn new(provider: Arc<dyn LocationSearchProvider>, caches: Arc<CacheSet>) -> Self {
        let mut index = HashMap::new();
        for location in dataset::builtin_locations() {
            index_location(&mut index, &location);
        }
        Self {
            provider,
            caches,
            index: RwLock::new(index),
            max_hubs: DEFAULT_MAX_HUBS,
        }
    }

    /// Override the per-city hub cap.
    pub fn with_max_hubs(mut self, max_hubs: usize) -> Self {
        self.max_hubs = max_hubs;
        self
    }

    /// Search for locations matching a free-text query.
    ///
    /// Queries shorter than two characters return empty without
    /// touching the cache or the provider.
    pub async fn search(&self, query: &str) -> Vec<Arc<Location>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < 2 {
            return Vec::new();
        }
        let normalized = trimmed.to_lowercase();

        let key = cache_key(&[
            ("kind", json!("location_search")),
            ("query", json!(normalized)),
        ]);
        let result: Result<_, Infallible> = self
            .caches
            .locations
            .cached(key, SEARCH_TTL, || async {
                Ok(self.search_uncached(&normalized).await)
            })
            .await;
        match result {
            Ok(locations) => locations,
            Err(never) => match never {},
        }
    }

    async fn search_uncached(&self, query: &str) -> Vec<Arc<Location>> {
        match self.provider.search(query).await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => dataset::search_builtin(query),
            Err(err) => {
                warn!(query, error = %err, "location search failed, using builtin dataset");
                dataset::search_builtin(query)
            }
        }
    }

    /// Expand a location name into concrete transport hubs.
    ///
    /// Cities map to the known hubs sharing the city's short name,
    /// capped at `max_hubs`. Hubs map to themselves. An unresolvable
    /// name maps to nothing.
    pub async fn find_nearby_hubs(&self, name: &str) -> Vec<Arc<Location>> {
        let candidates = self.search(name).await;
        let Some(main) = candidates.first().cloned() else {
            return Vec::new();
        };

        if main.kind.is_hub() {
            return vec![main];
        }

        let key = cache_key(&[
            ("kind", json!("nearby_hubs")),
            ("location", json!(main.id)),
        ]);
        let result: Result<_, Infallible> = self
            .caches
            .locations
            .cached(key, HUBS_TTL, || async {
                let city = main.short_name().to_lowercase();
                let mut hubs: Vec<_> = dataset::builtin_locations()
                    .into_iter()
                    .filter(|loc| loc.kind.is_hub() && loc.name.to_lowercase().contains(&city))
                    .collect();
                hubs.truncate(self.max_hubs);
                Ok(hubs)
            })
            .await;
        match result {
            Ok(hubs) => hubs,
            Err(never) => match never {},
        }
    }

    /// Resolve a location id to its canonical record.
    ///
    /// Hits the in-memory index first; on a miss, searches for the id
    /// and remembers an exact match for next time.
    pub async fn resolve_by_id(&self, id: &str) -> Option<Arc<Location>> {
        let normalized = id.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        {
            let guard = self.index.read().await;
            if let Some(location) = guard.get(&normalized) {
                return Some(Arc::clone(location));
            }
        }

        let hit = self
            .search(&normalized)
            .await
            .into_iter()
            .find(|loc| loc.id.to_lowercase() == normalized)?;

        let mut guard = self.index.write().await;
        index_location(&mut guard, &hit);
        Some(hit)
    }
}

/// Register a location under its id and every provider code it carries.
fn index_location(index: &mut HashMap<String, Arc<Location>>, location: &Arc<Location>) {
    index.insert(location.id.to_lowercase(), Arc::clone(location));
    for code in location.provider_codes.values() {
        index
            .entry(code.to_lowercase())
            .or_insert_with(|| Arc::clone(location));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
        results: Vec<Arc<Location>>,
    }

    impl CountingProvider {
        fn new(results: Vec<Arc<Location>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                results,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
                results: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl LocationSearchProvider for CountingProvider {
        async fn search(&self, _query: &str) -> Result<Vec<Arc<Location>>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::MissingData("boom".into()));
            }
            Ok(self.results.clone())
        }
    }

    fn resolver(provider: CountingProvider) -> (Arc<CountingProvider>, LocationResolver) {
        let provider = Arc::new(provider);
        let caches = Arc::new(CacheSet::with_capacities(16, 16, 16));
        let resolver = LocationResolver::new(Arc::clone(&provider) as _, caches);
        (provider, resolver)
    }

    fn city(id: &str, name: &str) -> Arc<Location> {
        Arc::new(Location::new(id, name, LocationKind::City))
    }

    #[tokio::test]
    async fn short_query_skips_provider() {
        let (provider, resolver) = resolver(CountingProvider::new(vec![]));
        assert!(resolver.search("a").await.is_empty());
        assert!(resolver.search("  n ").await.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeat_search_is_served_from_cache() {
        let hits = vec![city("nyc", "New York, NY")];
        let (provider, resolver) = resolver(CountingProvider::new(hits));

        let first = resolver.search("New York").await;
        let second = resolver.search("  new york  ").await;
        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_builtin() {
        let (_, resolver) = resolver(CountingProvider::failing());
        let hits = resolver.search("athens").await;
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn empty_provider_results_fall_back_to_builtin() {
        let (_, resolver) = resolver(CountingProvider::new(vec![]));
        let hits = resolver.search("boston").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "bos");
    }

    #[tokio::test]
    async fn city_expands_to_matching_hubs() {
        let hits = vec![city("chi", "Chicago, IL")];
        let (_, resolver) = resolver(CountingProvider::new(hits));

        let hubs = resolver.find_nearby_hubs("Chicago").await;
        assert_eq!(hubs.len(), 1);
        assert_eq!(hubs[0].id, "ord");
    }

    #[tokio::test]
    async fn hub_expansion_respects_cap() {
        let hits = vec![city("ath", "Athens, Greece")];
        let (_, resolver) = resolver(CountingProvider::new(hits));
        let resolver = resolver.with_max_hubs(0);

        assert!(resolver.find_nearby_hubs("Athens").await.is_empty());
    }

    #[tokio::test]
    async fn hub_resolves_to_itself() {
        let (_, resolver) = resolver(CountingProvider::failing());
        let hubs = resolver.find_nearby_hubs("JFK Airport").await;
        assert_eq!(hubs.len(), 1);
        assert_eq!(hubs[0].id, "jfk");
    }

    #[tokio::test]
    async fn unresolvable_name_expands_to_nothing() {
        let (_, resolver) = resolver(CountingProvider::new(vec![]));
        assert!(resolver.find_nearby_hubs("zanzibar").await.is_empty());
    }

    #[tokio::test]
    async fn resolve_by_id_hits_seeded_index_without_search() {
        let (provider, resolver) = resolver(CountingProvider::new(vec![]));
        let loc = resolver.resolve_by_id("JFK").await.unwrap();
        assert_eq!(loc.id, "jfk");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolve_by_id_learns_from_search() {
        let hits = vec![city("rdu", "Raleigh-Durham, NC")];
        let (provider, resolver) = resolver(CountingProvider::new(hits));

        assert!(resolver.resolve_by_id("rdu").await.is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        // Second lookup comes from the index
        assert!(resolver.resolve_by_id("rdu").await.is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolve_by_unknown_id_is_none() {
        let (_, resolver) = resolver(CountingProvider::new(vec![]));
        assert!(resolver.resolve_by_id("nowhere").await.is_none());
        assert!(resolver.resolve_by_id("  ").await.is_none());
    }
}
