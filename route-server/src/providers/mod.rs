//! Segment providers.
//!
//! One provider per transport mode, each returning normalized
//! point-to-point segments for an (origin, destination, date) triple.
//! Providers run their upstream calls through the rate limiter and the
//! result cache, and degrade to synthetic-but-plausible data when the
//! upstream fails. By contract they never error: "no results" is an
//! empty live response, and every failure becomes a labeled synthetic
//! response so callers can tell live from fallback data.

mod bus;
mod client;
mod error;
mod flight;
pub mod synthetic;
mod train;
mod walk;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Location, TransportMode, TransportSegment};

pub use bus::BusProvider;
pub use client::{HereClient, HereConfig, SkyscannerClient, SkyscannerConfig};
pub use error::ProviderError;
pub use flight::{FlightApi, FlightProvider};
pub use train::TrainProvider;
pub use walk::{PedestrianRoutingApi, WalkProvider};

/// Where a provider response came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentSource {
    /// Data from the live upstream.
    Live,

    /// Fallback data generated locally; `reason` records why.
    Synthetic { reason: String },
}

/// The normalized result of one provider search.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub segments: Vec<Arc<TransportSegment>>,
    pub source: SegmentSource,
}

impl ProviderResponse {
    /// A response of live upstream segments (possibly empty).
    pub fn live(segments: Vec<Arc<TransportSegment>>) -> Self {
        Self {
            segments,
            source: SegmentSource::Live,
        }
    }

    /// A synthetic fallback response.
    pub fn synthetic(segments: Vec<Arc<TransportSegment>>, reason: impl Into<String>) -> Self {
        Self {
            segments,
            source: SegmentSource::Synthetic {
                reason: reason.into(),
            },
        }
    }

    /// Returns true for fallback data.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.source, SegmentSource::Synthetic { .. })
    }
}

/// A searchable source of transport segments for one mode.
///
/// Implementations must not error: ordinary "no result" conditions are
/// an empty live response, and upstream failures are absorbed into a
/// synthetic response at this boundary.
#[async_trait]
pub trait SegmentProvider: Send + Sync {
    /// The mode this provider serves.
    fn mode(&self) -> TransportMode;

    /// Search for segments from `origin` to `destination` on `date`.
    async fn search(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        date: NaiveDate,
    ) -> ProviderResponse;
}

/// The full set of providers the engine fans out to.
pub struct ProviderSet {
    pub flight: Arc<dyn SegmentProvider>,
    pub train: Arc<dyn SegmentProvider>,
    pub bus: Arc<dyn SegmentProvider>,
    pub walk: Arc<dyn SegmentProvider>,
}

impl ProviderSet {
    /// Look up the provider for a mode.
    pub fn for_mode(&self, mode: TransportMode) -> &Arc<dyn SegmentProvider> {
        match mode {
            TransportMode::Flight => &self.flight,
            TransportMode::Train => &self.train,
            TransportMode::Bus => &self.bus,
            TransportMode::Walk => &self.walk,
        }
    }
}

/// Cache key for a provider search.
pub(crate) fn segment_cache_key(
    mode: TransportMode,
    origin: &Location,
    destination: &Location,
    date: NaiveDate,
) -> String {
    crate::cache::cache_key(&[
        ("mode", serde_json::json!(mode.as_str())),
        ("origin", serde_json::json!(origin.id)),
        ("destination", serde_json::json!(destination.id)),
        ("date", serde_json::json!(date.to_string())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationKind;

    #[test]
    fn response_source_flags() {
        let live = ProviderResponse::live(vec![]);
        assert!(!live.is_synthetic());

        let synthetic = ProviderResponse::synthetic(vec![], "upstream down");
        assert!(synthetic.is_synthetic());
        assert_eq!(
            synthetic.source,
            SegmentSource::Synthetic {
                reason: "upstream down".into()
            }
        );
    }

    #[test]
    fn segment_cache_key_varies_by_query() {
        let jfk = Location::new("jfk", "JFK Airport, NY", LocationKind::Airport);
        let lax = Location::new("lax", "Los Angeles International Airport", LocationKind::Airport);
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let a = segment_cache_key(TransportMode::Flight, &jfk, &lax, date);
        let b = segment_cache_key(TransportMode::Train, &jfk, &lax, date);
        let c = segment_cache_key(TransportMode::Flight, &lax, &jfk, date);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.contains("jfk"));
        assert!(a.contains("2026-09-01"));
    }
}
