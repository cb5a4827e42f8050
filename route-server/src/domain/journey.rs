//! Journey types.
//!
//! A `Journey` is a complete trip: either a single segment (direct) or
//! two segments joined at a shared location with enough time to make the
//! connection. Connections are limited to one transfer by design; this
//! is a tractability bound, not a shortest-path search.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::{DomainError, Location, TransportSegment};

/// Minimum connection gap when changing between different hubs of the
/// same city (one name contains the other).
const SAME_CITY_TRANSFER: i64 = 60;

/// Minimum connection gap between unrelated locations.
const DEFAULT_TRANSFER: i64 = 120;

/// Minimum gap required to transfer between two locations.
///
/// Zero for the same location, 60 minutes between different hubs of the
/// same city (detected by one name containing the other), 120 minutes
/// otherwise.
pub fn required_transfer_time(from: &Location, to: &Location) -> Duration {
    if from.id == to.id {
        return Duration::zero();
    }

    if from.name.contains(&to.name) || to.name.contains(&from.name) {
        return Duration::minutes(SAME_CITY_TRANSFER);
    }

    Duration::minutes(DEFAULT_TRANSFER)
}

/// A complete trip from origin to destination.
///
/// # Invariants
///
/// - One or two segments
/// - For two segments: the first arrives where the second departs, and
///   the gap between them is at least the required transfer time
#[derive(Debug, Clone)]
pub struct Journey {
    id: String,
    segments: Vec<Arc<TransportSegment>>,
    total_price: f64,
}

impl Journey {
    /// Construct a direct (single-segment) journey.
    pub fn direct(segment: Arc<TransportSegment>) -> Self {
        let id = format!("journey-{}", segment.id);
        let total_price = segment.price;
        Self {
            id,
            segments: vec![segment],
            total_price,
        }
    }

    /// Construct a one-transfer journey from two segments.
    ///
    /// The required transfer time is computed for the connection pair
    /// (`first.destination`, `second.origin`). Because segments only
    /// connect when those ids are equal, the same-id rule applies and a
    /// non-negative gap is sufficient; the 60/120-minute rules govern
    /// locations that differ.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the segments do not share a connection location,
    /// or the gap between arrival and the next departure is shorter than
    /// the required transfer time for that location pair.
    pub fn transfer(
        first: Arc<TransportSegment>,
        second: Arc<TransportSegment>,
    ) -> Result<Self, DomainError> {
        if first.destination.id != second.origin.id {
            return Err(DomainError::SegmentsNotConnected {
                arrival: first.destination.id.clone(),
                departure: second.origin.id.clone(),
            });
        }

        let required = required_transfer_time(&first.destination, &second.origin);
        let gap = second.departure_time - first.arrival_time;
        if gap < required {
            return Err(DomainError::ConnectionTooTight {
                gap_mins: gap.num_minutes(),
                required_mins: required.num_minutes(),
            });
        }

        let id = format!("journey-{}-{}", first.id, second.id);
        let total_price = first.price + second.price;
        Ok(Self {
            id,
            segments: vec![first, second],
            total_price,
        })
    }

    /// Journey identifier, derived from the segment ids.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The segments in travel order (length 1 or 2).
    pub fn segments(&self) -> &[Arc<TransportSegment>] {
        &self.segments
    }

    /// Combined price of all segments.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Number of transfers (0 for direct, 1 otherwise).
    pub fn transfer_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Departure time of the first segment.
    pub fn departure_time(&self) -> DateTime<Utc> {
        // Safe: at least one segment by construction
        self.segments.first().unwrap().departure_time
    }

    /// Arrival time of the last segment.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        // Safe: at least one segment by construction
        self.segments.last().unwrap().arrival_time
    }

    /// Total elapsed time, first departure to last arrival.
    ///
    /// Includes any connection wait, so for a transfer journey this is
    /// longer than the sum of the segment durations.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time() - self.departure_time()
    }

    /// The overall origin.
    pub fn origin(&self) -> &Arc<Location> {
        &self.segments.first().unwrap().origin
    }

    /// The overall destination.
    pub fn destination(&self) -> &Arc<Location> {
        &self.segments.last().unwrap().destination
    }
}
