//! Multi-modal route planner server.
//!
//! A web service that answers: "how do I get from A to B on this
//! date?" across flights, trains, buses and walking, combining direct
//! and one-transfer journeys sorted by price.

pub mod cache;
pub mod domain;
pub mod engine;
pub mod geo;
pub mod limiter;
pub mod locations;
pub mod providers;
pub mod web;
