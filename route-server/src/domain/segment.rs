//! Transport segment type.
//!
//! A `TransportSegment` is one point-to-point hop returned by a segment
//! provider. Segments are time-sensitive and owned by a single routing
//! request; they are never cached across requests (only the providers'
//! underlying lookups are).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::{DomainError, Location, TransportMode};

/// One point-to-point hop on a single mode of transport.
///
/// # Invariants
///
/// - `arrival_time > departure_time`
/// - `price >= 0`
#[derive(Debug, Clone)]
pub struct TransportSegment {
    pub id: String,
    pub origin: Arc<Location>,
    pub destination: Arc<Location>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: f64,
    pub mode: TransportMode,
    pub provider: String,
    pub booking_link: String,
}

impl TransportSegment {
    /// Construct a segment, validating time ordering and price.
    ///
    /// # Errors
    ///
    /// Returns `Err` if arrival is not strictly after departure, or the
    /// price is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        origin: Arc<Location>,
        destination: Arc<Location>,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        price: f64,
        mode: TransportMode,
        provider: impl Into<String>,
        booking_link: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if arrival_time <= departure_time {
            return Err(DomainError::NonPositiveDuration);
        }
        if price < 0.0 {
            return Err(DomainError::NegativePrice(price));
        }

        Ok(Self {
            id: id.into(),
            origin,
            destination,
            departure_time,
            arrival_time,
            price,
            mode,
            provider: provider.into(),
            booking_link: booking_link.into(),
        })
    }

    /// Travel time from departure to arrival.
    pub fn duration(&self) -> Duration {
        self.arrival_time - self.departure_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationKind;
    use chrono::TimeZone;

    fn loc(id: &str) -> Arc<Location> {
        Arc::new(Location::new(id, id.to_uppercase(), LocationKind::Airport))
    }

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn valid_segment() {
        let seg = TransportSegment::new(
            "flight-1",
            loc("jfk"),
            loc("lax"),
            t(10),
            t(16),
            199.0,
            TransportMode::Flight,
            "Mock Airlines",
            "https://example.com/book",
        )
        .unwrap();

        assert_eq!(seg.duration(), Duration::hours(6));
        assert_eq!(seg.mode, TransportMode::Flight);
    }

    #[test]
    fn reject_arrival_before_departure() {
        let result = TransportSegment::new(
            "flight-1",
            loc("jfk"),
            loc("lax"),
            t(16),
            t(10),
            199.0,
            TransportMode::Flight,
            "Mock Airlines",
            "",
        );
        assert_eq!(result.unwrap_err(), DomainError::NonPositiveDuration);
    }

    #[test]
    fn reject_zero_duration() {
        let result = TransportSegment::new(
            "walk-1",
            loc("jfk"),
            loc("lga"),
            t(10),
            t(10),
            0.0,
            TransportMode::Walk,
            "Walking",
            "",
        );
        assert_eq!(result.unwrap_err(), DomainError::NonPositiveDuration);
    }

    #[test]
    fn reject_negative_price() {
        let result = TransportSegment::new(
            "bus-1",
            loc("nyc"),
            loc("bos"),
            t(8),
            t(12),
            -1.0,
            TransportMode::Bus,
            "Budget Bus Lines",
            "",
        );
        assert_eq!(result.unwrap_err(), DomainError::NegativePrice(-1.0));
    }

    #[test]
    fn free_segment_allowed() {
        // Walking is free
        let result = TransportSegment::new(
            "walk-1",
            loc("jfk"),
            loc("lga"),
            t(10),
            t(11),
            0.0,
            TransportMode::Walk,
            "Walking",
            "",
        );
        assert!(result.is_ok());
    }
}
