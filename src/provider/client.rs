//! Upstream weather API client
//!
//! Thin reqwest wrapper around the provider's current-conditions endpoint.
//! Each call issues exactly one request with a bounded timeout and maps
//! failures into [`ProviderError`]; there is no retry at this layer.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::provider::types::{CurrentConditions, Forecast};

/// Location selector for a current-conditions request.
///
/// Exactly one selector is encoded per request; [`WeatherQuery::from_parts`]
/// enforces that at least one was supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// Provider numeric city identifier
    CityId(i64),
    /// Free-text place name, e.g. "London" or "London,UK"
    Name(String),
    /// Latitude/longitude pair
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// Build a query from optional request parts. A city name takes
    /// precedence when both a name and coordinates are present.
    pub fn from_parts(
        city: Option<String>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<Self, ProviderError> {
        if let Some(city) = city.filter(|c| !c.trim().is_empty()) {
            return Ok(Self::Name(city));
        }

        if let (Some(lat), Some(lon)) = (lat, lon) {
            return Ok(Self::Coordinates { lat, lon });
        }

        Err(ProviderError::MissingSelector)
    }
}

/// Errors surfaced by the provider boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no location selector supplied; provide a city name or a lat/lon pair")]
    MissingSelector,

    #[error("provider rejected the configured credentials (HTTP 401)")]
    Unauthorized { body: Option<String> },

    #[error("provider returned HTTP {status}")]
    Status { status: u16, body: Option<String> },

    #[error("provider request timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    #[error("provider request failed: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("provider response body was not a valid weather payload: {details}")]
    MalformedBody { details: String },
}

/// Client for the upstream current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenWeatherClient {
    /// Create a client from application configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.weather_api_base.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone().unwrap_or_default(),
            timeout: Duration::from_secs(config.collector.fetch_timeout_seconds),
        }
    }

    /// Fetch current conditions for a tracked city by provider identifier.
    pub async fn current_by_city_id(&self, city_id: i64) -> Result<CurrentConditions, ProviderError> {
        self.current(&WeatherQuery::CityId(city_id)).await
    }

    /// Fetch current conditions for the given location selector.
    pub async fn current(&self, query: &WeatherQuery) -> Result<CurrentConditions, ProviderError> {
        debug!(?query, "Fetching current conditions from provider");
        self.fetch("weather", query).await
    }

    /// Fetch the 5-day/3-hour forecast for the given location selector.
    /// Forecasts are never persisted; the payload is handed back as-is.
    pub async fn forecast(&self, query: &WeatherQuery) -> Result<Forecast, ProviderError> {
        debug!(?query, "Fetching forecast from provider");
        self.fetch("forecast", query).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &WeatherQuery,
    ) -> Result<T, ProviderError> {
        let mut params: Vec<(&str, String)> = vec![
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];

        match query {
            WeatherQuery::CityId(id) => params.push(("id", id.to_string())),
            WeatherQuery::Name(name) => params.push(("q", name.clone())),
            WeatherQuery::Coordinates { lat, lon } => {
                params.push(("lat", lat.to_string()));
                params.push(("lon", lon.to_string()));
            }
        }

        let response = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    ProviderError::Timeout {
                        timeout_seconds: self.timeout.as_secs(),
                    }
                } else {
                    ProviderError::Network { source }
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.ok();
            return Err(ProviderError::Unauthorized {
                body: body.map(truncate_body),
            });
        }

        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.map(truncate_body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::MalformedBody {
                details: err.to_string(),
            })
    }
}

fn truncate_body(body: String) -> String {
    if body.chars().count() > 200 {
        let truncated: String = body.chars().take(200).collect();
        format!("{}...", truncated)
    } else {
        body
    }
}
