//! Synthetic segment generation.
//!
//! When an upstream is unavailable or unconfigured, providers fall back
//! to deterministic-shaped but randomized schedules so the assembly
//! logic always has plausible data to combine. This degradation is a
//! feature (the system stays demo-safe without API keys), and every
//! fallback response is labeled synthetic at the provider boundary.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;

use crate::domain::{Location, TransportMode, TransportSegment};
use crate::geo::distance_between;

/// Flights below this distance are not realistic and produce nothing.
pub const MIN_FLIGHT_DISTANCE_KM: f64 = 100.0;

/// Assumed cruise speed for estimating flight durations.
const FLIGHT_SPEED_KMH: f64 = 500.0;

/// Assumed walking speed.
const WALK_SPEED_KMH: f64 = 5.0;

/// Detour factor for walking estimates (paths are not straight lines).
const WALK_DETOUR: f64 = 1.2;

/// First departure of the day for synthetic schedules.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

/// Two plausible one-way flights, or nothing when the hop is too short.
///
/// Duration is estimated from distance at 500 km/h plus an hour for
/// boarding and taxiing; falls back to two hours when coordinates are
/// missing.
pub fn flight_segments(
    origin: &Arc<Location>,
    destination: &Arc<Location>,
    date: NaiveDate,
) -> Vec<Arc<TransportSegment>> {
    let mut flight_hours: i64 = 2;

    if let Some(distance) = distance_between(origin, destination) {
        if distance < MIN_FLIGHT_DISTANCE_KM {
            return Vec::new();
        }
        flight_hours = ((distance / FLIGHT_SPEED_KMH).round() as i64 + 1).max(1);
    }

    let mut rng = rand::rng();
    let departure = day_start(date);
    let second_departure = departure + Duration::hours(6);

    let candidates = [
        (
            departure,
            199.0 + rng.random_range(0..200) as f64,
            "Mock Airlines",
        ),
        (
            second_departure,
            149.0 + rng.random_range(0..150) as f64,
            "Budget Air",
        ),
    ];

    candidates
        .into_iter()
        .enumerate()
        .filter_map(|(i, (dep, price, carrier))| {
            TransportSegment::new(
                format!("flight-syn-{}-{}-{}", origin.id, destination.id, i + 1),
                Arc::clone(origin),
                Arc::clone(destination),
                dep,
                dep + Duration::hours(flight_hours),
                price,
                TransportMode::Flight,
                carrier,
                "https://example.com/book",
            )
            .ok()
            .map(Arc::new)
        })
        .collect()
}

/// One plausible five-hour train run.
pub fn train_segments(
    origin: &Arc<Location>,
    destination: &Arc<Location>,
    date: NaiveDate,
) -> Vec<Arc<TransportSegment>> {
    let mut rng = rand::rng();
    let departure = day_start(date);

    TransportSegment::new(
        format!("train-syn-{}-{}", origin.id, destination.id),
        Arc::clone(origin),
        Arc::clone(destination),
        departure,
        departure + Duration::hours(5),
        79.0 + rng.random_range(0..40) as f64,
        TransportMode::Train,
        "Rail Express",
        "https://example.com/book-train",
    )
    .ok()
    .map(Arc::new)
    .into_iter()
    .collect()
}

/// One plausible eight-hour bus run.
pub fn bus_segments(
    origin: &Arc<Location>,
    destination: &Arc<Location>,
    date: NaiveDate,
) -> Vec<Arc<TransportSegment>> {
    let mut rng = rand::rng();
    let departure = day_start(date);

    TransportSegment::new(
        format!("bus-syn-{}-{}", origin.id, destination.id),
        Arc::clone(origin),
        Arc::clone(destination),
        departure,
        departure + Duration::hours(8),
        35.0 + rng.random_range(0..25) as f64,
        TransportMode::Bus,
        "Budget Bus Lines",
        "https://example.com/book-bus",
    )
    .ok()
    .map(Arc::new)
    .into_iter()
    .collect()
}

/// Estimated walking duration between two locations.
///
/// Based on straight-line distance at 5 km/h with a 20% detour factor,
/// clamped to between 5 minutes and 3 hours. Thirty minutes when
/// coordinates are missing.
pub fn estimated_walk_duration(origin: &Location, destination: &Location) -> Duration {
    let minutes = match distance_between(origin, destination) {
        Some(distance) => {
            let estimate = (distance / WALK_SPEED_KMH) * 60.0 * WALK_DETOUR;
            (estimate.ceil() as i64).clamp(5, 180)
        }
        None => 30,
    };
    Duration::minutes(minutes)
}

/// Exactly one walking segment with an estimated duration.
pub fn walk_segments(
    origin: &Arc<Location>,
    destination: &Arc<Location>,
    date: NaiveDate,
) -> Vec<Arc<TransportSegment>> {
    let departure = day_start(date);
    let duration = estimated_walk_duration(origin, destination);

    TransportSegment::new(
        format!("walk-syn-{}-{}", origin.id, destination.id),
        Arc::clone(origin),
        Arc::clone(destination),
        departure,
        departure + duration,
        0.0,
        TransportMode::Walk,
        "Walking (estimated)",
        "",
    )
    .ok()
    .map(Arc::new)
    .into_iter()
    .collect()
}
