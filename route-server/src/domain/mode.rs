//! Transport mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A means of travelling a point-to-point segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
    Walk,
}

impl TransportMode {
    /// All modes, in the order the engine considers them.
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Walk,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Flight,
    ];

    /// Stable lowercase name, used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Flight => "flight",
            TransportMode::Train => "train",
            TransportMode::Bus => "bus",
            TransportMode::Walk => "walk",
        }
    }

    /// The rate-limiter service identifier for this mode's upstream.
    pub fn service_name(&self) -> &'static str {
        match self {
            TransportMode::Flight => "skyscanner",
            TransportMode::Train => "rail",
            TransportMode::Bus => "bus",
            TransportMode::Walk => "here",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        for mode in TransportMode::ALL {
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TransportMode::Flight).unwrap(),
            "\"flight\""
        );
        let back: TransportMode = serde_json::from_str("\"walk\"").unwrap();
        assert_eq!(back, TransportMode::Walk);
    }
}
