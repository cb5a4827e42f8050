//! Walking segment provider.
//!
//! Asks a pedestrian-routing upstream for a walking duration between
//! the two points and produces exactly one free segment. Falls back to
//! a distance-based estimate when the upstream is unavailable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::cache::CacheSet;
use crate::domain::{Location, TransportMode, TransportSegment};
use crate::limiter::RateLimiter;

use super::{ProviderError, ProviderResponse, SegmentProvider, segment_cache_key, synthetic};

/// TTL for cached pedestrian routes.
const WALK_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Upstream pedestrian-routing API.
#[async_trait]
pub trait PedestrianRoutingApi: Send + Sync {
    /// Walking duration between two locations.
    async fn walking_duration(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<chrono::Duration, ProviderError>;
}

/// Walking provider: free single-segment routes.
pub struct WalkProvider {
    upstream: Option<Arc<dyn PedestrianRoutingApi>>,
    caches: Arc<CacheSet>,
    limiter: Arc<RateLimiter>,
}

impl WalkProvider {
    /// Create a provider. Without an upstream every search uses the
    /// distance-based estimate.
    pub fn new(
        upstream: Option<Arc<dyn PedestrianRoutingApi>>,
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
            .ok_or(ProviderError::NotConfigured("pedestrian routing"))?;

        let _permit = self
            .limiter
            .acquire(TransportMode::Walk.service_name())
            .await?;

        let duration = upstream.walking_duration(origin, destination).await?;
        let departure = date.and_hms_opt(0, 0, 0).unwrap().and_utc();

        let segment = TransportSegment::new(
            format!("walk-{}-{}", origin.id, destination.id),
            Arc::clone(origin),
            Arc::clone(destination),
            departure,
            departure + duration,
            0.0,
            TransportMode::Walk,
            "Walking",
            "",
        )
        .map_err(|e| ProviderError::MissingData(e.to_string()))?;

        Ok(ProviderResponse::live(vec![Arc::new(segment)]))
    }
}

#[async_trait]
impl SegmentProvider for WalkProvider {
    fn mode(&self) -> TransportMode {
        TransportMode::Walk
    }

    async fn search(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        date: NaiveDate,
    ) -> ProviderResponse {
        let key = segment_cache_key(self.mode(), origin, destination, date);
        let result = self
            .caches
            .routes
            .cached(key, WALK_CACHE_TTL, || {
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
                    "pedestrian routing failed, estimating walk"
                );
                ProviderResponse::synthetic(
                    synthetic::walk_segments(origin, destination, date),
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

    struct StubRoutingApi {
        minutes: i64,
    }

    #[async_trait]
    impl PedestrianRoutingApi for StubRoutingApi {
        async fn walking_duration(
            &self,
            _origin: &Location,
            _destination: &Location,
        ) -> Result<chrono::Duration, ProviderError> {
            Ok(chrono::Duration::minutes(self.minutes))
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

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn live_route_yields_single_free_segment() {
        let provider = WalkProvider::new(
            Some(Arc::new(StubRoutingApi { minutes: 45 })),
            Arc::new(CacheSet::new()),
            Arc::new(RateLimiter::with_default_services()),
        );

        let response = provider.search(&jfk(), &lga(), date()).await;

        assert!(!response.is_synthetic());
        assert_eq!(response.segments.len(), 1);
        let seg = &response.segments[0];
        assert_eq!(seg.price, 0.0);
        assert_eq!(seg.duration(), chrono::Duration::minutes(45));
    }

    #[tokio::test(start_paused = true)]
    async fn without_upstream_estimates_walk() {
        let provider = WalkProvider::new(
            None,
            Arc::new(CacheSet::new()),
            Arc::new(RateLimiter::with_default_services()),
        );

        let response = provider.search(&jfk(), &lga(), date()).await;

        assert!(response.is_synthetic());
        assert_eq!(response.segments.len(), 1);
        assert_eq!(response.segments[0].price, 0.0);
    }
}
