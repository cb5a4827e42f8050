//! Flight segment provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::cache::CacheSet;
use crate::domain::{Location, TransportMode, TransportSegment};
use crate::geo::distance_between;
use crate::limiter::RateLimiter;

use super::synthetic::{self, MIN_FLIGHT_DISTANCE_KM};
use super::{ProviderError, ProviderResponse, SegmentProvider, segment_cache_key};

/// TTL for cached flight searches.
const FLIGHT_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Upstream flight-search API returning normalized segments.
///
/// The wire format is the client's concern; the provider only sees
/// segments or an error.
#[async_trait]
pub trait FlightApi: Send + Sync {
    async fn search_one_way(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        date: NaiveDate,
    ) -> Result<Vec<Arc<TransportSegment>>, ProviderError>;
}

/// Flight provider: upstream search with caching, rate limiting, a
/// short-distance cheap rejection, and synthetic fallback.
pub struct FlightProvider {
    upstream: Option<Arc<dyn FlightApi>>,
    caches: Arc<CacheSet>,
    limiter: Arc<RateLimiter>,
}

impl FlightProvider {
    /// Create a provider. Without an upstream every search degrades to
    /// synthetic data.
    pub fn new(
        upstream: Option<Arc<dyn FlightApi>>,
        caches: Arc<CacheSet>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            upstream,
            caches,
            limiter,
        }
    }

    async fn perform_live(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        date: NaiveDate,
    ) -> Result<ProviderResponse, ProviderError> {
        let upstream = self
            .upstream
            .as_deref()
            .ok_or(ProviderError::NotConfigured("flight search"))?;

        let _permit = self
            .limiter
            .acquire(TransportMode::Flight.service_name())
            .await?;

        let segments = upstream.search_one_way(origin, destination, date).await?;
        Ok(ProviderResponse::live(segments))
    }
}

#[async_trait]
impl SegmentProvider for FlightProvider {
    fn mode(&self) -> TransportMode {
        TransportMode::Flight
    }

    async fn search(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        date: NaiveDate,
    ) -> ProviderResponse {
        // Flights are not realistic over short hops; skip the upstream
        // (and its rate limit) entirely.
        if let Some(distance) = distance_between(origin, destination) {
            if distance < MIN_FLIGHT_DISTANCE_KM {
                debug!(
                    origin = %origin.name,
                    destination = %destination.name,
                    distance_km = distance,
                    "distance below flight minimum, skipping search"
                );
                return ProviderResponse::live(Vec::new());
            }
        }

        let key = segment_cache_key(self.mode(), origin, destination, date);
        let result = self
            .caches
            .api
            .cached(key, FLIGHT_CACHE_TTL, || {
                self.perform_live(origin, destination, date)
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    origin = %origin.name,
                    destination = %destination.name,
                    error = %err,
                    "flight search failed, using synthetic data"
                );
                ProviderResponse::synthetic(
                    synthetic::flight_segments(origin, destination, date),
                    err.to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationKind;
    use crate::limiter::ServiceLimits;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFlightApi {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubFlightApi {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl FlightApi for StubFlightApi {
        async fn search_one_way(
            &self,
            origin: &Arc<Location>,
            destination: &Arc<Location>,
            date: NaiveDate,
        ) -> Result<Vec<Arc<TransportSegment>>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Api {
                    status: 502,
                    message: "bad gateway".into(),
                });
            }
            Ok(synthetic::flight_segments(origin, destination, date))
        }
    }

    fn jfk() -> Arc<Location> {
        Arc::new(
            Location::new("jfk", "JFK Airport, NY", LocationKind::Airport)
                .with_coordinates(40.6413, -73.7781),
        )
    }

    fn lga() -> Arc<Location> {
        Arc::new(
            Location::new("lga", "LaGuardia Airport, NY", LocationKind::Airport)
                .with_coordinates(40.7769, -73.8740),
        )
    }

    fn lax() -> Arc<Location> {
        Arc::new(
            Location::new("lax", "Los Angeles International Airport", LocationKind::Airport)
                .with_coordinates(33.9416, -118.4085),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn provider(upstream: Option<Arc<dyn FlightApi>>) -> FlightProvider {
        FlightProvider::new(
            upstream,
            Arc::new(CacheSet::new()),
            Arc::new(RateLimiter::with_default_services()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn short_distance_skips_upstream() {
        let api = StubFlightApi::new(false);
        let provider = provider(Some(api.clone()));

        let response = provider.search(&jfk(), &lga(), date()).await;

        assert!(response.segments.is_empty());
        assert!(!response.is_synthetic());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn live_results_are_cached() {
        let api = StubFlightApi::new(false);
        let provider = provider(Some(api.clone()));

        let first = provider.search(&jfk(), &lax(), date()).await;
        let second = provider.search(&jfk(), &lax(), date()).await;

        assert!(!first.is_synthetic());
        assert_eq!(first.segments.len(), second.segments.len());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_failure_degrades_to_synthetic() {
        let api = StubFlightApi::new(true);
        let provider = provider(Some(api.clone()));

        let response = provider.search(&jfk(), &lax(), date()).await;

        assert!(response.is_synthetic());
        assert!(!response.segments.is_empty());

        // Failures are not cached: the upstream is retried next time
        provider.search(&jfk(), &lax(), date()).await;
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_upstream_degrades_to_synthetic() {
        let provider = provider(None);

        let response = provider.search(&jfk(), &lax(), date()).await;

        assert!(response.is_synthetic());
        assert!(!response.segments.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_timeout_degrades_to_synthetic() {
        let mut limits = HashMap::new();
        limits.insert(
            "skyscanner".to_string(),
            ServiceLimits::new(1, Duration::from_secs(600))
                .with_queue_timeout(Duration::from_secs(1)),
        );
        let limiter = Arc::new(RateLimiter::new(limits));

        // Exhaust the single slot
        let _held = limiter.acquire("skyscanner").await.unwrap();

        let api = StubFlightApi::new(false);
        let provider = FlightProvider::new(
            Some(api.clone()),
            Arc::new(CacheSet::new()),
            limiter,
        );

        let response = provider.search(&jfk(), &lax(), date()).await;

        assert!(response.is_synthetic());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }
}
