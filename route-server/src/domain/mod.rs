//! Domain types for the trip-routing engine.
//!
//! These are the core validated types the engine operates on. Invariants
//! (segment times ordered, journeys connected, transfer gaps respected)
//! are enforced at construction time, so code receiving these types can
//! trust their validity.

mod error;
mod journey;
mod location;
mod mode;
mod segment;

pub use error::DomainError;
pub use journey::{Journey, required_transfer_time};
pub use location::{CODE_SKY_ENTITY_ID, CODE_SKY_ID, Coordinates, Location, LocationKind};
pub use mode::TransportMode;
pub use segment::TransportSegment;
