//! Location search and resolution.
//!
//! Free-text search backed by a live auto-complete provider with a
//! builtin-dataset fallback, city to nearby-hub expansion, and an id
//! index for repeat lookups.

mod client;
pub mod dataset;
mod resolver;

pub use client::{
    LocationClientConfig, LocationSearchProvider, SkyscannerLocationClient,
    StaticLocationProvider,
};
pub use resolver::LocationResolver;
