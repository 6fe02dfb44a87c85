use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocodeConfig;
use crate::models::Location;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Could not find location for the specified address")]
    NotFound,

    #[error("Geocoding provider error: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Unavailable(err.to_string())
    }
}

/// Free-text address to coordinates. Both failure modes are terminal for the
/// current request; callers do not retry.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// Single result row from the Nominatim search endpoint. Coordinates come
/// back as strings and are parsed here.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

fn location_from_results(results: Vec<SearchResult>) -> Result<Location, GeocodeError> {
    let first = results.into_iter().next().ok_or(GeocodeError::NotFound)?;
    let lat = first
        .lat
        .parse::<f64>()
        .map_err(|_| GeocodeError::Unavailable(format!("unparseable latitude: {}", first.lat)))?;
    let lng = first
        .lon
        .parse::<f64>()
        .map_err(|_| GeocodeError::Unavailable(format!("unparseable longitude: {}", first.lon)))?;
    Ok(Location { lat, lng })
}

/// Geocoding client backed by the Nominatim search API.
pub struct NominatimClient {
    http: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(config: &GeocodeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn resolve(&self, address: &str) -> Result<Location, GeocodeError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Unavailable(format!(
                "provider returned HTTP {}",
                response.status()
            )));
        }

        let results: Vec<SearchResult> = response.json().await?;
        location_from_results(results)
    }
}
