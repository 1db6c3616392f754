//! Payload normalization
//!
//! Pure mapping from the provider's raw current-conditions payload into
//! the rows the store persists. No IO happens here; every failure is a
//! description of what was missing or invalid in the payload.

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use crate::provider::types::CurrentConditions;

/// Draft city row produced from a provider payload, prior to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCity {
    pub city_id: i64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: i32,
}

/// Draft weather observation produced from a provider payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeatherRecord {
    pub city_id: i64,
    pub city_name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub humidity: i32,
    pub wind_speed: f64,
    pub wind_direction: i32,
    pub cloudiness: i32,
    pub visibility: i32,
    pub weather_main: String,
    pub weather_description: String,
    pub weather_icon: String,
    pub recorded_at: DateTime<FixedOffset>,
}

/// A provider payload that cannot be normalized into a storable row.
#[derive(Debug, Error)]
pub enum MalformedPayloadError {
    #[error("payload is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("payload observation timestamp {dt} is not a valid epoch second")]
    InvalidTimestamp { dt: i64 },
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, MalformedPayloadError> {
    value.ok_or(MalformedPayloadError::MissingField { field })
}

/// Normalize a raw payload into a weather row and its city row.
///
/// Every stored field must be present in the payload; a payload that omits
/// any of them is rejected rather than stored with holes. Precipitation
/// volumes and wind gusts are the only sections a well-formed payload may
/// omit, and they are not part of the stored row. When the payload carries
/// multiple condition entries only the first is kept.
pub fn transform(
    payload: &CurrentConditions,
) -> Result<(NewWeatherRecord, NewCity), MalformedPayloadError> {
    let city_id = require(payload.id, "id")?;
    let city_name = require(payload.name.clone(), "name")?;
    let main = require(payload.main.as_ref(), "main")?;
    let coord = require(payload.coord.as_ref(), "coord")?;
    let sys = require(payload.sys.as_ref(), "sys")?;
    let wind = require(payload.wind.as_ref(), "wind")?;
    let clouds = require(payload.clouds.as_ref(), "clouds")?;
    let condition = require(payload.weather.first(), "weather")?;
    let dt = require(payload.dt, "dt")?;

    let recorded_at = DateTime::<Utc>::from_timestamp(dt, 0)
        .ok_or(MalformedPayloadError::InvalidTimestamp { dt })?
        .fixed_offset();

    let country = require(sys.country.clone(), "sys.country")?;
    let latitude = require(coord.lat, "coord.lat")?;
    let longitude = require(coord.lon, "coord.lon")?;

    let record = NewWeatherRecord {
        city_id,
        city_name: city_name.clone(),
        country: country.clone(),
        latitude,
        longitude,
        temperature: require(main.temp, "main.temp")?,
        feels_like: require(main.feels_like, "main.feels_like")?,
        temp_min: require(main.temp_min, "main.temp_min")?,
        temp_max: require(main.temp_max, "main.temp_max")?,
        pressure: require(main.pressure, "main.pressure")?,
        humidity: require(main.humidity, "main.humidity")?,
        wind_speed: require(wind.speed, "wind.speed")?,
        wind_direction: require(wind.deg, "wind.deg")?,
        cloudiness: require(clouds.all, "clouds.all")?,
        visibility: require(payload.visibility, "visibility")?,
        weather_main: require(condition.main.clone(), "weather.main")?,
        weather_description: require(condition.description.clone(), "weather.description")?,
        weather_icon: require(condition.icon.clone(), "weather.icon")?,
        recorded_at,
    };

    let city = NewCity {
        city_id,
        name: city_name,
        country,
        latitude,
        longitude,
        timezone: require(payload.timezone, "timezone")?,
    };

    Ok((record, city))
}
