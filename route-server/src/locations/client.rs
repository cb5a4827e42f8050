//! Location search providers.
//!
//! `LocationSearchProvider` is the seam between the resolver and the
//! outside world. The production implementation queries the flight
//! API's auto-complete endpoint; `StaticLocationProvider` serves the
//! builtin dataset for tests and offline mode.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{CODE_SKY_ENTITY_ID, CODE_SKY_ID, Location, LocationKind};
use crate::providers::ProviderError;

use super::dataset;

/// A source of locations matching a free-text query.
#[async_trait]
pub trait LocationSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Arc<Location>>, ProviderError>;
}

/// Serves the builtin dataset without any network access.
pub struct StaticLocationProvider;

#[async_trait]
impl LocationSearchProvider for StaticLocationProvider {
    async fn search(&self, query: &str) -> Result<Vec<Arc<Location>>, ProviderError> {
        Ok(dataset::search_builtin(query))
    }
}

/// Default base URL for the auto-complete endpoint.
const AUTOCOMPLETE_BASE_URL: &str = "https://skyscanner89.p.rapidapi.com";

/// Configuration for the auto-complete client.
#[derive(Debug, Clone)]
pub struct LocationClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl LocationClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: AUTOCOMPLETE_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Auto-complete client against the flight API.
pub struct SkyscannerLocationClient {
    http: reqwest::Client,
    config: LocationClientConfig,
}

#[derive(Debug, Deserialize)]
struct AutoCompleteResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    entity_id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    city_name: Option<String>,
    country_name: Option<String>,
    iata: Option<String>,
    centroid_coordinates: Option<Centroid>,
    relevant_flight_params: Option<FlightParams>,
}

#[derive(Debug, Deserialize)]
struct Centroid {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightParams {
    sky_id: Option<String>,
    entity_id: Option<String>,
}

impl SkyscannerLocationClient {
    /// Create a client with the given configuration.
    pub fn new(config: LocationClientConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }
}

/// Map an upstream place record to a domain location.
fn convert_place(place: Place) -> Arc<Location> {
    let kind = match place.kind.as_str() {
        "AIRPORT" | "AIRPORT_GROUP" => LocationKind::Airport,
        "STATION" => LocationKind::TrainStation,
        _ => LocationKind::City,
    };

    let sky_id = place
        .relevant_flight_params
        .as_ref()
        .and_then(|p| p.sky_id.clone())
        .or_else(|| place.iata.clone());
    let entity_id = place
        .relevant_flight_params
        .as_ref()
        .and_then(|p| p.entity_id.clone())
        .unwrap_or_else(|| place.entity_id.clone());

    let id = sky_id
        .as_deref()
        .or(place.iata.as_deref())
        .unwrap_or(&place.entity_id)
        .to_lowercase();

    let mut name = place.name.clone();
    if let Some(city) = &place.city_name {
        if city != &place.name {
            name = format!("{name}, {city}");
        }
    }
    if let Some(country) = &place.country_name {
        name = format!("{name}, {country}");
    }

    let mut location = Location::new(id, name, kind);
    if let Some(centroid) = place.centroid_coordinates {
        location = location.with_coordinates(centroid.latitude, centroid.longitude);
    }
    if let Some(sky_id) = sky_id {
        location = location.with_provider_code(CODE_SKY_ID, sky_id);
    }
    location = location.with_provider_code(CODE_SKY_ENTITY_ID, entity_id);

    Arc::new(location)
}

#[async_trait]
impl LocationSearchProvider for SkyscannerLocationClient {
    async fn search(&self, query: &str) -> Result<Vec<Arc<Location>>, ProviderError> {
        let url = format!("{}/flights/auto-complete", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .query(&[("query", query), ("locale", "en-US"), ("market", "US")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: AutoCompleteResponse = response.json().await?;
        Ok(body.places.into_iter().map(convert_place).collect())
    }
}
