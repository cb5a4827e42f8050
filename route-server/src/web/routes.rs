//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use tracing::error;

use crate::engine::{EngineError, RouteQuery};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(search_routes))
        .route("/api/locations/search", get(search_locations))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search for journeys between two locations.
async fn search_routes(
    State(state): State<AppState>,
    Query(req): Query<RouteSearchRequest>,
) -> Result<Json<RouteSearchResponse>, AppError> {
    let date = NaiveDate::parse_from_str(&req.date, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest {
            message: format!("Invalid date: {}", req.date),
        }
    })?;

    if req.max_price.is_some_and(|p| p < 0.0) {
        return Err(AppError::BadRequest {
            message: "max_price must be non-negative".to_string(),
        });
    }
    if req.max_duration.is_some_and(|d| d <= 0.0) {
        return Err(AppError::BadRequest {
            message: "max_duration must be positive".to_string(),
        });
    }

    let query = RouteQuery {
        origin_id: req.origin,
        destination_id: req.destination,
        departure_date: date,
        max_price: req.max_price,
        max_duration_hours: req.max_duration,
    };
    let journeys = state.engine.find_routes(&query).await?;

    Ok(Json(RouteSearchResponse {
        journeys: journeys.iter().map(JourneyResult::from_journey).collect(),
    }))
}

/// Search locations by free text.
async fn search_locations(
    State(state): State<AppState>,
    Query(req): Query<LocationSearchRequest>,
) -> Json<LocationSearchResponse> {
    let matches = state.resolver.search(&req.q).await;

    let locations = matches
        .iter()
        .map(|loc| LocationResult::from_location(loc))
        .collect();

    Json(LocationSearchResponse { locations })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidEndpoint { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
