//! Web layer for the route planner.
//!
//! Provides HTTP endpoints for route search and location lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
