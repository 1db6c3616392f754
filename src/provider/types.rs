//! Raw provider payload types
//!
//! Structured mirror of the provider's current-conditions JSON. Every field
//! the transformer requires is modelled as `Option` so that a missing or
//! ill-shaped field is detected as a shape check during transform rather
//! than a deserialization failure; extra provider fields are ignored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// As-received current-conditions payload, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CurrentConditions {
    /// Geographic coordinates of the observation
    pub coord: Option<Coord>,
    /// Weather condition list; only the first element is used downstream
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Internal provider parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Main measurement block
    pub main: Option<MainMeasurements>,
    /// Visibility in metres
    pub visibility: Option<i32>,
    /// Wind block
    pub wind: Option<Wind>,
    /// Cloudiness block
    pub clouds: Option<Clouds>,
    /// Rain volume, when raining
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    /// Snow volume, when snowing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    /// Observation time, unix seconds UTC
    pub dt: Option<i64>,
    /// Country and sun times
    pub sys: Option<SysInfo>,
    /// UTC offset in seconds
    pub timezone: Option<i32>,
    /// Provider city identifier
    pub id: Option<i64>,
    /// City display name
    pub name: Option<String>,
    /// Provider response code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod: Option<serde_json::Value>,
}

/// As-received 5-day/3-hour forecast payload.
///
/// Forecasts are served through unchanged and never persisted, so the
/// shape stays as loose as [`CurrentConditions`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Forecast {
    /// Provider response code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod: Option<serde_json::Value>,
    /// Number of forecast entries returned
    pub cnt: Option<i32>,
    /// Forecast entries at three-hour intervals
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    /// Place the forecast covers
    pub city: Option<ForecastCity>,
}

/// One three-hour forecast slot
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ForecastEntry {
    /// Forecast time, unix seconds UTC
    pub dt: Option<i64>,
    /// Main measurement block
    pub main: Option<MainMeasurements>,
    /// Weather condition list
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Cloudiness block
    pub clouds: Option<Clouds>,
    /// Wind block
    pub wind: Option<Wind>,
    /// Visibility in metres
    pub visibility: Option<i32>,
    /// Probability of precipitation, 0 to 1
    pub pop: Option<f64>,
    /// Rain volume, when forecast
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    /// Snow volume, when forecast
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    /// Forecast time as text
    pub dt_txt: Option<String>,
}

/// Place metadata attached to a forecast
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ForecastCity {
    /// Provider city identifier
    pub id: Option<i64>,
    /// City display name
    pub name: Option<String>,
    /// Geographic coordinates
    pub coord: Option<Coord>,
    /// ISO country code
    pub country: Option<String>,
    /// UTC offset in seconds
    pub timezone: Option<i32>,
    /// Sunrise time, unix seconds UTC
    pub sunrise: Option<i64>,
    /// Sunset time, unix seconds UTC
    pub sunset: Option<i64>,
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct Coord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Weather condition details
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    /// Provider condition identifier
    pub id: Option<i64>,
    /// Group of weather parameters (Rain, Snow, Clouds, ...)
    pub main: Option<String>,
    /// Condition description within the group
    pub description: Option<String>,
    /// Provider icon code
    pub icon: Option<String>,
}

/// Main weather measurements
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct MainMeasurements {
    /// Temperature in degrees Celsius
    pub temp: Option<f64>,
    /// Perceived temperature
    pub feels_like: Option<f64>,
    /// Minimum observed temperature
    pub temp_min: Option<f64>,
    /// Maximum observed temperature
    pub temp_max: Option<f64>,
    /// Atmospheric pressure in hPa
    pub pressure: Option<i32>,
    /// Relative humidity percentage
    pub humidity: Option<i32>,
    /// Sea-level pressure, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<i32>,
    /// Ground-level pressure, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<i32>,
}

/// Wind information
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct Wind {
    /// Wind speed in m/s
    pub speed: Option<f64>,
    /// Wind direction in degrees
    pub deg: Option<i32>,
    /// Gust speed, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

/// Cloudiness data
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct Clouds {
    /// Cloudiness percentage
    pub all: Option<i32>,
}

/// Precipitation volume over trailing windows
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct Precipitation {
    /// Volume for the last hour, in mm
    #[serde(rename = "1h", skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<f64>,
    /// Volume for the last three hours, in mm
    #[serde(rename = "3h", skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

/// Country and sun times
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SysInfo {
    /// ISO country code
    pub country: Option<String>,
    /// Sunrise time, unix seconds UTC
    pub sunrise: Option<i64>,
    /// Sunset time, unix seconds UTC
    pub sunset: Option<i64>,
}
