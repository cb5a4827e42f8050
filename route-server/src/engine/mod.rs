//! Multi-modal route search.
//!
//! A single-shot pipeline per request: resolve both endpoints, pick
//! transport modes by direct distance, expand each endpoint into
//! nearby hubs, fan out provider searches across every viable
//! (mode, hub pair) combination, then assemble direct and one-transfer
//! journeys sorted by price. Provider failures never surface here;
//! by contract each provider degrades to synthetic data internally.

mod assemble;
mod config;

pub use config::EngineConfig;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Journey, Location, TransportMode, TransportSegment};
use crate::geo::distance_between;
use crate::locations::LocationResolver;
use crate::providers::ProviderSet;

use assemble::JourneyFilters;

/// A route search request.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub origin_id: String,
    pub destination_id: String,
    pub departure_date: NaiveDate,
    pub max_price: Option<f64>,
    pub max_duration_hours: Option<f64>,
}

/// Errors surfaced by route search.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An endpoint id did not resolve to a known location.
    #[error("unknown origin or destination: {id}")]
    InvalidEndpoint { id: String },
}

/// The route search orchestrator.
pub struct RoutingEngine {
    resolver: Arc<LocationResolver>,
    providers: ProviderSet,
    config: EngineConfig,
}

impl RoutingEngine {
    pub fn new(
        resolver: Arc<LocationResolver>,
        providers: ProviderSet,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            providers,
            config,
        }
    }

    /// Find journeys between two endpoints.
    ///
    /// Returns journeys sorted ascending by total price. An empty list
    /// is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidEndpoint` when either endpoint id
    /// fails to resolve.
    pub async fn find_routes(&self, query: &RouteQuery) -> Result<Vec<Journey>, EngineError> {
        let origin = self.resolve(&query.origin_id).await?;
        let destination = self.resolve(&query.destination_id).await?;

        let direct_distance = distance_between(&origin, &destination);
        let modes = self.config.selected_modes(direct_distance);
        debug!(
            origin = %origin.id,
            destination = %destination.id,
            distance_km = ?direct_distance,
            ?modes,
            "selected transport modes"
        );

        let origin_hubs = self.expand_hubs(&origin).await;
        let destination_hubs = self.expand_hubs(&destination).await;

        let segments = self
            .gather_segments(
                &origin,
                &destination,
                &origin_hubs,
                &destination_hubs,
                &modes,
                query.departure_date,
            )
            .await;
        debug!(count = segments.len(), "gathered segments");

        let origin_ids: HashSet<String> = origin_hubs.iter().map(|h| h.id.clone()).collect();
        let destination_ids: HashSet<String> =
            destination_hubs.iter().map(|h| h.id.clone()).collect();
        let filters = JourneyFilters {
            max_price: query.max_price,
            max_duration_hours: query.max_duration_hours,
        };

        let mut journeys =
            assemble::assemble_direct(&segments, &origin_ids, &destination_ids, filters);
        journeys.extend(assemble::assemble_transfers(
            &segments,
            &destination_ids,
            filters,
            self.config.max_transfer_pairs,
        ));
        assemble::sort_by_price(&mut journeys);

        info!(
            origin = %origin.id,
            destination = %destination.id,
            journeys = journeys.len(),
            "route search complete"
        );
        Ok(journeys)
    }

    async fn resolve(&self, id: &str) -> Result<Arc<Location>, EngineError> {
        self.resolver
            .resolve_by_id(id)
            .await
            .ok_or_else(|| EngineError::InvalidEndpoint { id: id.to_string() })
    }

    /// The endpoint itself plus its nearby hubs, deduplicated by id and
    /// capped at `max_hubs_per_side`.
    async fn expand_hubs(&self, endpoint: &Arc<Location>) -> Vec<Arc<Location>> {
        let nearby = self.resolver.find_nearby_hubs(&endpoint.name).await;

        let mut hubs = Vec::with_capacity(nearby.len() + 1);
        let mut seen = HashSet::new();
        for hub in std::iter::once(Arc::clone(endpoint)).chain(nearby) {
            if seen.insert(hub.id.clone()) {
                hubs.push(hub);
            }
            if hubs.len() == self.config.max_hubs_per_side {
                break;
            }
        }
        hubs
    }

    /// Fan out provider searches and collect every returned segment.
    ///
    /// Walking is searched once, between the original endpoints only.
    /// Every other selected mode is searched per distinct hub pair,
    /// with the mode's distance threshold re-checked against the pair's
    /// own distance. All searches run concurrently; assembly is a pure
    /// function of the collected list, so completion order is
    /// irrelevant.
    async fn gather_segments(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        origin_hubs: &[Arc<Location>],
        destination_hubs: &[Arc<Location>],
        modes: &[TransportMode],
        date: NaiveDate,
    ) -> Vec<Arc<TransportSegment>> {
        let mut searches = Vec::new();

        if modes.contains(&TransportMode::Walk) {
            searches.push(self.providers.walk.search(origin, destination, date));
        }

        for hub_origin in origin_hubs {
            for hub_destination in destination_hubs {
                if hub_origin.id == hub_destination.id {
                    continue;
                }
                let pair_distance = distance_between(hub_origin, hub_destination);

                for &mode in modes {
                    if mode == TransportMode::Walk {
                        continue;
                    }
                    if !self.config.mode_applies(mode, pair_distance) {
                        continue;
                    }
                    searches.push(self.providers.for_mode(mode).search(
                        hub_origin,
                        hub_destination,
                        date,
                    ));
                }
            }
        }

        join_all(searches)
            .await
            .into_iter()
            .flat_map(|response| response.segments)
            .collect()
    }
}
