//! Upstream HTTP clients.
//!
//! Thin reqwest adapters for the flight-search and pedestrian-routing
//! upstreams. They normalize wire responses into domain segments and
//! durations; everything interesting about failure handling lives in
//! the providers, which treat any error here as a cue to degrade.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::{
    CODE_SKY_ENTITY_ID, CODE_SKY_ID, Location, TransportMode, TransportSegment,
};

use super::flight::FlightApi;
use super::walk::PedestrianRoutingApi;
use super::ProviderError;

/// Default base URL for the flight-search API.
const SKYSCANNER_BASE_URL: &str = "https://skyscanner89.p.rapidapi.com";

/// Default base URL for the routing API.
const HERE_BASE_URL: &str = "https://router.hereapi.com/v8";

/// Configuration for the flight-search client.
#[derive(Debug, Clone)]
pub struct SkyscannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl SkyscannerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: SKYSCANNER_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Flight-search HTTP client.
pub struct SkyscannerClient {
    http: reqwest::Client,
    config: SkyscannerConfig,
}

#[derive(Debug, Deserialize)]
struct OneWayResponse {
    #[serde(default)]
    itineraries: Vec<Itinerary>,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    #[serde(default)]
    legs: Vec<ItineraryLeg>,
    #[serde(default, rename = "pricingOptions")]
    pricing_options: Vec<PricingOption>,
}

#[derive(Debug, Deserialize)]
struct ItineraryLeg {
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    #[serde(default)]
    carriers: Vec<Carrier>,
}

#[derive(Debug, Deserialize)]
struct Carrier {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PricingOption {
    price: Price,
    #[serde(default, rename = "deepLink")]
    deep_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Price {
    amount: f64,
}

impl SkyscannerClient {
    /// Create a client with the given configuration.
    pub fn new(config: SkyscannerConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// The provider codes for a location, defaulting to its id when no
    /// codes are attached.
    fn codes(location: &Location) -> (&str, &str) {
        let sky_id = location.provider_code(CODE_SKY_ID).unwrap_or(&location.id);
        let entity_id = location
            .provider_code(CODE_SKY_ENTITY_ID)
            .unwrap_or(&location.id);
        (sky_id, entity_id)
    }
}

#[async_trait]
impl FlightApi for SkyscannerClient {
    async fn search_one_way(
        &self,
        origin: &Arc<Location>,
        destination: &Arc<Location>,
        date: NaiveDate,
    ) -> Result<Vec<Arc<TransportSegment>>, ProviderError> {
        let (origin_sky, origin_entity) = Self::codes(origin);
        let (dest_sky, dest_entity) = Self::codes(destination);

        let url = format!("{}/flights/one-way/list", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .query(&[
                ("origin", origin_sky),
                ("originId", origin_entity),
                ("destination", dest_sky),
                ("destinationId", dest_entity),
                ("date", &date.to_string()),
                ("adults", "1"),
                ("cabinClass", "economy"),
                ("currency", "USD"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: OneWayResponse = response.json().await?;

        let mut segments = Vec::new();
        for (i, itinerary) in body.itineraries.into_iter().enumerate() {
            let (Some(leg), Some(pricing)) =
                (itinerary.legs.first(), itinerary.pricing_options.first())
            else {
                continue;
            };

            let carrier = leg
                .carriers
                .first()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown Airline".to_string());
            let booking_link = pricing
                .deep_link
                .clone()
                .unwrap_or_else(|| "https://www.skyscanner.com".to_string());

            // Itineraries with inconsistent times are dropped rather
            // than failing the whole response
            if let Ok(segment) = TransportSegment::new(
                format!("flight-{}-{}-{}", origin.id, destination.id, i + 1),
                Arc::clone(origin),
                Arc::clone(destination),
                leg.departure,
                leg.arrival,
                pricing.price.amount,
                TransportMode::Flight,
                carrier,
                booking_link,
            ) {
                segments.push(Arc::new(segment));
            }
        }

        Ok(segments)
    }
}

/// Configuration for the pedestrian-routing client.
#[derive(Debug, Clone)]
pub struct HereConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl HereConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: HERE_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Pedestrian-routing HTTP client.
pub struct HereClient {
    http: reqwest::Client,
    config: HereConfig,
}

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(rename = "type")]
    kind: Option<String>,
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    duration: u64,
}

impl HereClient {
    /// Create a client with the given configuration.
    pub fn new(config: HereConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn waypoint(location: &Location) -> Result<String, ProviderError> {
        let coords = location.coordinates.ok_or_else(|| {
            ProviderError::MissingData(format!("{} has no coordinates", location.id))
        })?;
        Ok(format!("{},{}", coords.lat, coords.lng))
    }
}

#[async_trait]
impl PedestrianRoutingApi for HereClient {
    async fn walking_duration(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<chrono::Duration, ProviderError> {
        let url = format!("{}/routes", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("transportMode", "pedestrian"),
                ("origin", &Self::waypoint(origin)?),
                ("destination", &Self::waypoint(destination)?),
                ("return", "summary"),
                ("apiKey", &self.config.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: RoutesResponse = response.json().await?;
        let route = body
            .routes
            .first()
            .ok_or_else(|| ProviderError::MissingData("no routes returned".into()))?;

        // Sum only the pedestrian sections
        let total_secs: u64 = route
            .sections
            .iter()
            .filter(|s| s.kind.as_deref().is_none_or(|k| k == "pedestrian"))
            .filter_map(|s| s.summary.as_ref().map(|summary| summary.duration))
            .sum();

        if total_secs == 0 {
            return Err(ProviderError::MissingData(
                "route has no pedestrian sections".into(),
            ));
        }

        Ok(chrono::Duration::seconds(total_secs as i64))
    }
}
