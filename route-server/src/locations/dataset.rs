//! Builtin location dataset.
//!
//! A small set of well-known cities and transport hubs used as the
//! fallback when the live location search is unavailable, and as the
//! hub pool for nearby-hub expansion.

use std::sync::Arc;

use crate::domain::{CODE_SKY_ENTITY_ID, CODE_SKY_ID, Location, LocationKind};

fn entry(
    id: &str,
    name: &str,
    kind: LocationKind,
    lat: f64,
    lng: f64,
    sky_id: &str,
    entity_id: &str,
) -> Arc<Location> {
    Arc::new(
        Location::new(id, name, kind)
            .with_coordinates(lat, lng)
            .with_provider_code(CODE_SKY_ID, sky_id)
            .with_provider_code(CODE_SKY_ENTITY_ID, entity_id),
    )
}

/// The builtin dataset.
pub fn builtin_locations() -> Vec<Arc<Location>> {
    use LocationKind::{Airport, City};
    vec![
        entry("nyc", "New York, NY", City, 40.7128, -74.0060, "NYC", "27537542"),
        entry("jfk", "JFK Airport, NY", Airport, 40.6413, -73.7781, "JFK", "95673298"),
        entry("lga", "LaGuardia Airport, NY", Airport, 40.7769, -73.8740, "LGA", "95565060"),
        entry("bos", "Boston, MA", City, 42.3601, -71.0589, "BOS", "27538629"),
        entry("sfo", "San Francisco, CA", City, 37.7749, -122.4194, "SFO", "27544026"),
        entry(
            "lax",
            "Los Angeles International Airport",
            Airport,
            33.9416,
            -118.4085,
            "LAX",
            "95673784",
        ),
        entry("chi", "Chicago, IL", City, 41.8781, -87.6298, "CHI", "27535663"),
        entry(
            "ord",
            "O'Hare International Airport, Chicago",
            Airport,
            41.9742,
            -87.9073,
            "ORD",
            "95673749",
        ),
        entry("ith", "Ithaca, NY", City, 42.4440, -76.5019, "ITH", "27545475"),
        entry("ath", "Athens, Greece", City, 37.9838, 23.7275, "ATH", "27539604"),
        entry(
            "ath-airport",
            "Athens International Airport",
            Airport,
            37.9364,
            23.9445,
            "ATH",
            "95673376",
        ),
    ]
}

/// Case-insensitive substring match over the builtin dataset.
pub fn search_builtin(query: &str) -> Vec<Arc<Location>> {
    let needle = query.to_lowercase();
    builtin_locations()
        .into_iter()
        .filter(|loc| loc.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_ids_are_unique() {
        let locations = builtin_locations();
        let mut ids: Vec<_> = locations.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), locations.len());
    }

    #[test]
    fn every_entry_has_coordinates_and_codes() {
        for loc in builtin_locations() {
            assert!(loc.coordinates.is_some(), "{} missing coordinates", loc.id);
            assert!(loc.provider_code(CODE_SKY_ID).is_some());
            assert!(loc.provider_code(CODE_SKY_ENTITY_ID).is_some());
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let hits = search_builtin("new york");
        assert!(hits.iter().any(|l| l.id == "nyc"));

        let athens = search_builtin("Athens");
        assert_eq!(athens.len(), 2);
    }

    #[test]
    fn search_with_no_match_is_empty() {
        assert!(search_builtin("zanzibar").is_empty());
    }
}
