//! Location types.
//!
//! A `Location` is either a concrete transport hub (airport, train
//! station, bus station) or a city that expands to nearby hubs during
//! routing. Locations are immutable once constructed and shared as
//! `Arc<Location>`: the resolver's caches own them, the engine borrows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// The kind of place a location represents.
///
/// Cities are expanded to their nearby hubs by the resolver; the other
/// kinds are boarding points in their own right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Airport,
    TrainStation,
    BusStation,
    City,
}

impl LocationKind {
    /// Returns true if this location is a boarding point rather than a city.
    pub fn is_hub(&self) -> bool {
        !matches!(self, LocationKind::City)
    }

    /// Stable lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Airport => "airport",
            LocationKind::TrainStation => "train_station",
            LocationKind::BusStation => "bus_station",
            LocationKind::City => "city",
        }
    }
}

/// A canonical place record.
///
/// `provider_codes` holds opaque provider-specific identifiers (for
/// example a flight-search entity id) keyed by code name, replacing
/// per-provider optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub kind: LocationKind,
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub provider_codes: HashMap<String, String>,
}

/// Provider-code key for a Skyscanner place code (e.g. "JFK").
pub const CODE_SKY_ID: &str = "sky_id";

/// Provider-code key for a Skyscanner entity id.
pub const CODE_SKY_ENTITY_ID: &str = "sky_entity_id";

impl Location {
    /// Create a location without coordinates or provider codes.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: LocationKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            coordinates: None,
            provider_codes: HashMap::new(),
        }
    }

    /// Attach coordinates.
    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }

    /// Attach a provider-specific code.
    pub fn with_provider_code(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.provider_codes.insert(key.into(), value.into());
        self
    }

    /// Look up a provider-specific code.
    pub fn provider_code(&self, key: &str) -> Option<&str> {
        self.provider_codes.get(key).map(String::as_str)
    }

    /// The short name: everything before the first comma.
    ///
    /// "New York, NY" has the short name "New York"; used to match city
    /// names against hub names.
    pub fn short_name(&self) -> &str {
        self.name.split(',').next().unwrap_or(&self.name).trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let loc = Location::new("jfk", "JFK Airport, NY", LocationKind::Airport)
            .with_coordinates(40.6413, -73.7781)
            .with_provider_code(CODE_SKY_ID, "JFK")
            .with_provider_code(CODE_SKY_ENTITY_ID, "95673298");

        assert_eq!(loc.id, "jfk");
        assert_eq!(loc.kind, LocationKind::Airport);
        assert!(loc.coordinates.is_some());
        assert_eq!(loc.provider_code(CODE_SKY_ID), Some("JFK"));
        assert_eq!(loc.provider_code("unknown"), None);
    }

    #[test]
    fn short_name_strips_region() {
        let loc = Location::new("nyc", "New York, NY", LocationKind::City);
        assert_eq!(loc.short_name(), "New York");

        let loc = Location::new("ath", "Athens", LocationKind::City);
        assert_eq!(loc.short_name(), "Athens");
    }

    #[test]
    fn kind_is_hub() {
        assert!(LocationKind::Airport.is_hub());
        assert!(LocationKind::TrainStation.is_hub());
        assert!(LocationKind::BusStation.is_hub());
        assert!(!LocationKind::City.is_hub());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&LocationKind::TrainStation).unwrap();
        assert_eq!(json, "\"train_station\"");
        let back: LocationKind = serde_json::from_str("\"airport\"").unwrap();
        assert_eq!(back, LocationKind::Airport);
    }
}
