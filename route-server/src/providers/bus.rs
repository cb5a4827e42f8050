//! Bus segment provider.
//!
//! Like the train provider, buses have no live upstream; schedules are
//! generated locally, labeled synthetic, and cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::cache::CacheSet;
use crate::domain::{Location, TransportMode};
use crate::limiter::RateLimiter;

use super::{ProviderError, ProviderResponse, SegmentProvider, segment_cache_key, synthetic};

/// TTL for cached bus searches.
const BUS_CACHE_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// Reason attached to every bus response.
const NO_UPSTREAM: &str = "no live bus upstream";

/// Bus provider serving synthetic schedules.
pub struct BusProvider {
    caches: Arc<CacheSet>,
    limiter: Arc<RateLimiter>,
}

impl BusProvider {
    pub fn new(caches: Arc<CacheSet>, limiter: Arc<RateLimiter>) -> Self {
        Self { caches, limiter }
    }
}

#[async_trait]
impl SegmentProvider for BusProvider {
    fn mode(&self) -> TransportMode {
        TransportMode::Bus
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
            .cached(key, BUS_CACHE_TTL, || async {
                let _permit = self
                    .limiter
                    .acquire(TransportMode::Bus.service_name())
                    .await?;
                Ok::<_, ProviderError>(ProviderResponse::synthetic(
                    synthetic::bus_segments(origin, destination, date),
                    NO_UPSTREAM,
                ))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "bus search rate limited, generating uncached");
                ProviderResponse::synthetic(
                    synthetic::bus_segments(origin, destination, date),
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

    #[tokio::test(start_paused = true)]
    async fn always_synthetic_and_labeled() {
        let provider = BusProvider::new(
            Arc::new(CacheSet::new()),
            Arc::new(RateLimiter::with_default_services()),
        );
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let a = Arc::new(Location::new("nyc", "New York, NY", LocationKind::BusStation));
        let b = Arc::new(Location::new("bos", "Boston, MA", LocationKind::BusStation));

        let response = provider.search(&a, &b, date).await;

        assert!(response.is_synthetic());
        assert_eq!(response.segments.len(), 1);
        assert_eq!(response.segments[0].mode, TransportMode::Bus);
        assert_eq!(response.segments[0].duration(), chrono::Duration::hours(8));
    }
}
