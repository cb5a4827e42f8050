//! Train segment provider.
//!
//! There is no live rail upstream; schedules are generated locally and
//! labeled synthetic. Generation still runs through the rate limiter
//! and cache so the provider behaves like the others.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::cache::CacheSet;
use crate::domain::{Location, TransportMode};
use crate::limiter::RateLimiter;

use super::{ProviderError, ProviderResponse, SegmentProvider, segment_cache_key, synthetic};

/// TTL for cached train searches.
const TRAIN_CACHE_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// Reason attached to every train response.
const NO_UPSTREAM: &str = "no live rail upstream";

/// Train provider serving synthetic schedules.
pub struct TrainProvider {
    caches: Arc<CacheSet>,
    limiter: Arc<RateLimiter>,
}

impl TrainProvider {
    pub fn new(caches: Arc<CacheSet>, limiter: Arc<RateLimiter>) -> Self {
        Self { caches, limiter }
    }
}

#[async_trait]
impl SegmentProvider for TrainProvider {
    fn mode(&self) -> TransportMode {
        TransportMode::Train
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
            .api
            .cached(key, TRAIN_CACHE_TTL, || async {
                let _permit = self
                    .limiter
                    .acquire(TransportMode::Train.service_name())
                    .await?;
                Ok::<_, ProviderError>(ProviderResponse::synthetic(
                    synthetic::train_segments(origin, destination, date),
                    NO_UPSTREAM,
                ))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "train search rate limited, generating uncached");
                ProviderResponse::synthetic(
                    synthetic::train_segments(origin, destination, date),
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

    fn loc(id: &str, name: &str) -> Arc<Location> {
        Arc::new(Location::new(id, name, LocationKind::TrainStation))
    }

    #[tokio::test(start_paused = true)]
    async fn always_synthetic_and_labeled() {
        let provider = TrainProvider::new(
            Arc::new(CacheSet::new()),
            Arc::new(RateLimiter::with_default_services()),
        );
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let response = provider
            .search(&loc("nyc", "New York, NY"), &loc("bos", "Boston, MA"), date)
            .await;

        assert!(response.is_synthetic());
        assert_eq!(response.segments.len(), 1);
        assert_eq!(response.segments[0].mode, TransportMode::Train);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_queries_served_from_cache() {
        let provider = TrainProvider::new(
            Arc::new(CacheSet::new()),
            Arc::new(RateLimiter::with_default_services()),
        );
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let a = loc("nyc", "New York, NY");
        let b = loc("bos", "Boston, MA");

        let first = provider.search(&a, &b, date).await;
        let second = provider.search(&a, &b, date).await;

        // Prices are randomized at generation time, so a cache hit
        // returns the identical schedule
        assert_eq!(first.segments[0].price, second.segments[0].price);
    }
}
