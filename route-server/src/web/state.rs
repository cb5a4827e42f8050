//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::RoutingEngine;
use crate::locations::LocationResolver;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route search orchestrator
    pub engine: Arc<RoutingEngine>,

    /// Location search and id resolution
    pub resolver: Arc<LocationResolver>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: RoutingEngine, resolver: Arc<LocationResolver>) -> Self {
        Self {
            engine: Arc::new(engine),
            resolver,
        }
    }
}
