//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from API/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Segment arrival is not strictly after departure
    #[error("segment must arrive after it departs")]
    NonPositiveDuration,

    /// Segment price is negative
    #[error("segment price must not be negative (got {0})")]
    NegativePrice(f64),

    /// Second segment does not depart where the first one arrives
    #[error("segments do not connect: first arrives at {arrival}, second departs from {departure}")]
    SegmentsNotConnected {
        arrival: String,
        departure: String,
    },

    /// Connection gap is shorter than the required transfer time
    #[error("connection of {gap_mins} min is shorter than the required {required_mins} min transfer")]
    ConnectionTooTight {
        gap_mins: i64,
        required_mins: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::NonPositiveDuration;
        assert_eq!(err.to_string(), "segment must arrive after it departs");

        let err = DomainError::NegativePrice(-3.5);
        assert!(err.to_string().contains("-3.5"));

        let err = DomainError::SegmentsNotConnected {
            arrival: "jfk".into(),
            departure: "lga".into(),
        };
        assert!(err.to_string().contains("jfk"));
        assert!(err.to_string().contains("lga"));

        let err = DomainError::ConnectionTooTight {
            gap_mins: 30,
            required_mins: 60,
        };
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("60"));
    }
}
