//! Journey assembly.
//!
//! Pure functions over the gathered segment list. Assembly depends
//! only on the list contents, never on the order providers finished
//! in, so the engine's concurrent gather phase stays deterministic.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;

use crate::domain::{Journey, TransportSegment};

/// Price and duration limits from the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct JourneyFilters {
    pub max_price: Option<f64>,
    pub max_duration_hours: Option<f64>,
}

impl JourneyFilters {
    fn admits(&self, total_price: f64, total_duration: Duration) -> bool {
        if let Some(max_price) = self.max_price {
            if total_price > max_price {
                return false;
            }
        }
        if let Some(max_hours) = self.max_duration_hours {
            if total_duration.num_minutes() as f64 > max_hours * 60.0 {
                return false;
            }
        }
        true
    }
}

/// Build direct journeys.
///
/// A segment qualifies when its origin is one of the origin hubs and
/// its destination one of the destination hubs.
pub fn assemble_direct(
    segments: &[Arc<TransportSegment>],
    origin_ids: &HashSet<String>,
    destination_ids: &HashSet<String>,
    filters: JourneyFilters,
) -> Vec<Journey> {
    segments
        .iter()
        .filter(|seg| {
            origin_ids.contains(&seg.origin.id) && destination_ids.contains(&seg.destination.id)
        })
        .filter(|seg| filters.admits(seg.price, seg.duration()))
        .map(|seg| Journey::direct(Arc::clone(seg)))
        .collect()
}

/// Build one-transfer journeys.
///
/// Examines ordered segment pairs sharing a connection location, up to
/// `max_pairs` pairs. The cap is a performance bound: which candidates
/// fall past it depends on iteration order.
pub fn assemble_transfers(
    segments: &[Arc<TransportSegment>],
    destination_ids: &HashSet<String>,
    filters: JourneyFilters,
    max_pairs: usize,
) -> Vec<Journey> {
    let mut journeys = Vec::new();
    let mut examined = 0usize;

    'outer: for first in segments {
        for second in segments {
            if examined >= max_pairs {
                break 'outer;
            }
            examined += 1;

            if first.destination.id != second.origin.id {
                continue;
            }
            if !destination_ids.contains(&second.destination.id) {
                continue;
            }

            // Journey::transfer enforces the connection-gap rule
            let Ok(journey) = Journey::transfer(Arc::clone(first), Arc::clone(second)) else {
                continue;
            };
            if filters.admits(journey.total_price(), journey.total_duration()) {
                journeys.push(journey);
            }
        }
    }

    journeys
}

/// Sort journeys ascending by total price, preserving construction
/// order among equal prices.
pub fn sort_by_price(journeys: &mut [Journey]) {
    journeys.sort_by(|a, b| a.total_price().total_cmp(&b.total_price()));
}
