//! Great-circle distance calculations.
//!
//! Distances drive transport mode selection, so a location without
//! coordinates yields an *unknown* distance rather than an error: the
//! engine treats unknown distance as "consider every mode".

use crate::domain::{Coordinates, Location};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometres.
///
/// Uses the haversine formula.
pub fn distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two locations, if both carry coordinates.
///
/// Returns `None` when either side has no coordinates.
pub fn distance_between(a: &Location, b: &Location) -> Option<f64> {
    match (&a.coordinates, &b.coordinates) {
        (Some(ca), Some(cb)) => Some(distance_km(ca, cb)),
        _ => None,
    }
}
