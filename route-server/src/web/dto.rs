//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Journey, Location, TransportSegment};

/// Request to search for routes.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    /// Origin location id
    pub origin: String,

    /// Destination location id
    pub destination: String,

    /// Departure date, YYYY-MM-DD
    pub date: String,

    /// Optional price ceiling
    pub max_price: Option<f64>,

    /// Optional duration ceiling in hours
    pub max_duration: Option<f64>,
}

/// A segment in a journey result.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub id: String,
    pub mode: String,
    pub origin: LocationResult,
    pub destination: LocationResult,

    /// RFC 3339 departure time
    pub departure_time: String,

    /// RFC 3339 arrival time
    pub arrival_time: String,

    pub price: f64,
    pub provider: String,
    pub booking_link: String,
}

/// A journey in search results.
#[derive(Debug, Serialize)]
pub struct JourneyResult {
    pub id: String,
    pub segments: Vec<SegmentResult>,
    pub total_price: f64,
    pub total_duration_minutes: i64,
    pub transfers: usize,
}

/// Route search response.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    pub journeys: Vec<JourneyResult>,
}

/// Request to search for locations.
#[derive(Debug, Deserialize)]
pub struct LocationSearchRequest {
    pub q: String,
}

/// A location in search results.
#[derive(Debug, Serialize)]
pub struct LocationResult {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Location search response.
#[derive(Debug, Serialize)]
pub struct LocationSearchResponse {
    pub locations: Vec<LocationResult>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl LocationResult {
    pub fn from_location(location: &Location) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            kind: location.kind.as_str().to_string(),
            lat: location.coordinates.map(|c| c.lat),
            lng: location.coordinates.map(|c| c.lng),
        }
    }
}

impl SegmentResult {
    pub fn from_segment(segment: &TransportSegment) -> Self {
        Self {
            id: segment.id.clone(),
            mode: segment.mode.as_str().to_string(),
            origin: LocationResult::from_location(&segment.origin),
            destination: LocationResult::from_location(&segment.destination),
            departure_time: segment.departure_time.to_rfc3339(),
            arrival_time: segment.arrival_time.to_rfc3339(),
            price: segment.price,
            provider: segment.provider.clone(),
            booking_link: segment.booking_link.clone(),
        }
    }
}

impl JourneyResult {
    pub fn from_journey(journey: &Journey) -> Self {
        Self {
            id: journey.id().to_string(),
            segments: journey
                .segments()
                .iter()
                .map(|s| SegmentResult::from_segment(s))
                .collect(),
            total_price: journey.total_price(),
            total_duration_minutes: journey.total_duration().num_minutes(),
            transfers: journey.transfer_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationKind, TransportMode};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn location_kind_serializes_snake_case() {
        let loc = Location::new("lga", "LaGuardia Airport, NY", LocationKind::TrainStation);
        let dto = LocationResult::from_location(&loc);
        assert_eq!(dto.kind, "train_station");
        assert!(dto.lat.is_none());
    }

    #[test]
    fn journey_dto_reports_duration_in_minutes() {
        let a = Arc::new(
            Location::new("a", "A Airport", LocationKind::Airport).with_coordinates(1.0, 1.0),
        );
        let b = Arc::new(
            Location::new("b", "B Airport", LocationKind::Airport).with_coordinates(2.0, 2.0),
        );
        let segment = Arc::new(
            TransportSegment::new(
                "ab",
                Arc::clone(&a),
                Arc::clone(&b),
                Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 9, 1, 10, 30, 0).unwrap(),
                120.0,
                TransportMode::Flight,
                "Test Air",
                "https://example.com",
            )
            .unwrap(),
        );
        let dto = JourneyResult::from_journey(&Journey::direct(segment));

        assert_eq!(dto.total_duration_minutes, 150);
        assert_eq!(dto.transfers, 0);
        assert_eq!(dto.segments[0].mode, "flight");
        assert!(dto.segments[0].departure_time.starts_with("2026-09-01T08:00:00"));
    }
}
