//! Routing engine configuration.

use crate::domain::TransportMode;

/// Tuning knobs for route search.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum distance (km) at which walking is considered.
    pub walk_max_km: f64,

    /// Maximum distance (km) at which buses are considered.
    pub bus_max_km: f64,

    /// Maximum distance (km) at which trains are considered.
    pub train_max_km: f64,

    /// Maximum number of hubs searched per endpoint.
    /// Bounds the hub-pair fan-out.
    pub max_hubs_per_side: usize,

    /// Maximum number of segment pairs examined when building
    /// transfer journeys. Pairs beyond this are skipped.
    pub max_transfer_pairs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            walk_max_km: 10.0,
            bus_max_km: 300.0,
            train_max_km: 1000.0,
            max_hubs_per_side: 3,
            max_transfer_pairs: 1000,
        }
    }
}

impl EngineConfig {
    /// Whether a mode applies at the given distance.
    ///
    /// Boundaries are inclusive. An unknown distance (missing
    /// coordinates somewhere) enables every mode: recall over precision
    /// when geometry is unavailable. Flights use the bus threshold as
    /// their lower bound.
    pub fn mode_applies(&self, mode: TransportMode, distance_km: Option<f64>) -> bool {
        let Some(d) = distance_km else {
            return true;
        };
        match mode {
            TransportMode::Walk => d <= self.walk_max_km,
            TransportMode::Bus => d <= self.bus_max_km,
            TransportMode::Train => d <= self.train_max_km,
            TransportMode::Flight => d > self.bus_max_km,
        }
    }

    /// The modes worth searching at the given direct distance.
    pub fn selected_modes(&self, distance_km: Option<f64>) -> Vec<TransportMode> {
        TransportMode::ALL
            .iter()
            .copied()
            .filter(|mode| self.mode_applies(*mode, distance_km))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransportMode::{Bus, Flight, Train, Walk};

    #[test]
    fn unknown_distance_enables_every_mode() {
        let config = EngineConfig::default();
        assert_eq!(config.selected_modes(None).len(), 4);
    }

    #[test]
    fn short_hop_is_ground_only() {
        let config = EngineConfig::default();
        let modes = config.selected_modes(Some(17.0));
        assert!(modes.contains(&Bus));
        assert!(modes.contains(&Train));
        assert!(!modes.contains(&Walk));
        assert!(!modes.contains(&Flight));
    }

    #[test]
    fn walking_distance_selects_everything_but_flight() {
        let config = EngineConfig::default();
        let modes = config.selected_modes(Some(2.0));
        assert_eq!(modes.len(), 3);
        assert!(!modes.contains(&Flight));
    }

    #[test]
    fn long_haul_is_flight_only() {
        let config = EngineConfig::default();
        assert_eq!(config.selected_modes(Some(3936.0)), vec![Flight]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let config = EngineConfig::default();
        assert!(config.mode_applies(Walk, Some(10.0)));
        assert!(config.mode_applies(Bus, Some(300.0)));
        assert!(!config.mode_applies(Flight, Some(300.0)));
        assert!(config.mode_applies(Train, Some(1000.0)));
        assert!(!config.mode_applies(Train, Some(1000.1)));
    }
}
