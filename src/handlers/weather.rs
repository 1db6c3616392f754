//! # Weather API Handlers
//!
//! Handlers for live current conditions, stored observations and window
//! analytics. The live endpoint runs the same fetch-transform-store pipeline
//! the collector uses, so ad-hoc lookups also land in the history.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ApiError, ErrorType};
use crate::models::weather_record::Model as WeatherRecordModel;
use crate::provider::{CurrentConditions, Forecast, WeatherQuery};
use crate::repositories::{
    CityRepository, HistoricalQuery, WeatherAnalytics, WeatherRecordRepository,
};
use crate::server::AppState;
use crate::transform;

/// Query parameters for a live current-conditions lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct CurrentWeatherQuery {
    /// City name, e.g. "London" or "London,UK"
    pub city: Option<String>,
    /// Latitude, used together with `lon`
    pub lat: Option<f64>,
    /// Longitude, used together with `lat`
    pub lon: Option<f64>,
}

/// Query parameters for a historical observation lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoricalWeatherQuery {
    /// Inclusive window start (RFC 3339)
    pub start_date: Option<DateTime<FixedOffset>>,
    /// Inclusive window end (RFC 3339)
    pub end_date: Option<DateTime<FixedOffset>>,
    /// Maximum rows to return (default: 100, max: 1000)
    pub limit: Option<u64>,
}

/// Query parameters for window analytics
#[derive(Debug, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// Window length in days ending now (default: 7, max: 30)
    pub days: Option<i64>,
}

/// Live current conditions for a city name or coordinate pair.
///
/// The raw provider payload is returned after the observation has been
/// normalized and stored.
#[utoipa::path(
    get,
    path = "/weather/current",
    params(CurrentWeatherQuery),
    responses(
        (status = 200, description = "Current conditions", body = CurrentConditions),
        (status = 400, description = "No usable location selector", body = ApiError),
        (status = 401, description = "Provider rejected the API key", body = ApiError),
        (status = 502, description = "Provider failure", body = ApiError)
    ),
    tag = "weather"
)]
pub async fn current_weather(
    State(state): State<AppState>,
    Query(query): Query<CurrentWeatherQuery>,
) -> Result<Json<CurrentConditions>, ApiError> {
    let selector = WeatherQuery::from_parts(query.city, query.lat, query.lon)?;
    let payload = state.weather.current(&selector).await?;

    let (record, city) = transform::transform(&payload)?;
    CityRepository::new(&state.db).upsert(&city).await?;
    WeatherRecordRepository::new(&state.db)
        .insert(&record)
        .await?;

    Ok(Json(payload))
}

/// Five-day forecast at three-hour intervals for a city name or
/// coordinate pair.
///
/// Pure pass-through of the provider payload; forecasts are never stored.
#[utoipa::path(
    get,
    path = "/weather/forecast",
    params(CurrentWeatherQuery),
    responses(
        (status = 200, description = "Forecast entries", body = Forecast),
        (status = 400, description = "No usable location selector", body = ApiError),
        (status = 401, description = "Provider rejected the API key", body = ApiError),
        (status = 502, description = "Provider failure", body = ApiError)
    ),
    tag = "weather"
)]
pub async fn weather_forecast(
    State(state): State<AppState>,
    Query(query): Query<CurrentWeatherQuery>,
) -> Result<Json<Forecast>, ApiError> {
    let selector = WeatherQuery::from_parts(query.city, query.lat, query.lon)?;
    let payload = state.weather.forecast(&selector).await?;
    Ok(Json(payload))
}

/// Most recent stored observation for a city.
#[utoipa::path(
    get,
    path = "/weather/latest/{city_id}",
    params(
        ("city_id" = i64, Path, description = "Provider city identifier")
    ),
    responses(
        (status = 200, description = "Latest stored observation", body = WeatherRecordModel),
        (status = 404, description = "No observations stored for this city", body = ApiError)
    ),
    tag = "weather"
)]
pub async fn latest_weather(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<WeatherRecordModel>, ApiError> {
    let record = WeatherRecordRepository::new(&state.db)
        .latest_for_city(city_id)
        .await?
        .ok_or(ErrorType::NotFound)?;
    Ok(Json(record))
}

/// Most recent stored observation for every known city.
#[utoipa::path(
    get,
    path = "/weather/latest",
    responses(
        (status = 200, description = "Latest observation per city", body = [WeatherRecordModel])
    ),
    tag = "weather"
)]
pub async fn latest_weather_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeatherRecordModel>>, ApiError> {
    let records = WeatherRecordRepository::new(&state.db)
        .latest_per_city()
        .await?;
    Ok(Json(records))
}

/// Stored observations for a city within an optional time window.
#[utoipa::path(
    get,
    path = "/weather/historical/{city_id}",
    params(
        ("city_id" = i64, Path, description = "Provider city identifier"),
        HistoricalWeatherQuery
    ),
    responses(
        (status = 200, description = "Observations, newest first", body = [WeatherRecordModel]),
        (status = 400, description = "Invalid window", body = ApiError)
    ),
    tag = "weather"
)]
pub async fn historical_weather(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
    Query(query): Query<HistoricalWeatherQuery>,
) -> Result<Json<Vec<WeatherRecordModel>>, ApiError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date)
        && start > end
    {
        return Err(ApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "start_date must not be after end_date",
        ));
    }

    let records = WeatherRecordRepository::new(&state.db)
        .history(&HistoricalQuery {
            city_id,
            start: query.start_date,
            end: query.end_date,
            limit: query.limit,
        })
        .await?;
    Ok(Json(records))
}

/// Aggregate statistics for a city over the trailing N days.
#[utoipa::path(
    get,
    path = "/weather/analytics/{city_id}",
    params(
        ("city_id" = i64, Path, description = "Provider city identifier"),
        AnalyticsQuery
    ),
    responses(
        (status = 200, description = "Window aggregates", body = WeatherAnalytics),
        (status = 400, description = "Invalid window length", body = ApiError),
        (status = 404, description = "No observations in the window", body = ApiError)
    ),
    tag = "weather"
)]
pub async fn weather_analytics(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<WeatherAnalytics>, ApiError> {
    let days = query.days.unwrap_or(7);
    if !(1..=30).contains(&days) {
        return Err(ApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "days must be between 1 and 30",
        ));
    }

    let start = (Utc::now() - Duration::days(days)).fixed_offset();
    let analytics = WeatherRecordRepository::new(&state.db)
        .analytics(city_id, Some(start), None)
        .await?
        .ok_or(ErrorType::NotFound)?;
    Ok(Json(analytics))
}
