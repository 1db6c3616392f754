//! Weather record entity model
//!
//! SeaORM entity for the weather_records table. Each row is one normalized
//! observation for one city at one instant. `recorded_at` is the provider's
//! reported observation time, not collection wall-clock time; `id` and
//! `created_at` are assigned by the store and never written by the pipeline.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored weather observation
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = WeatherRecord)]
#[sea_orm(table_name = "weather_records")]
pub struct Model {
    /// Store-assigned identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Provider city identifier
    pub city_id: i64,

    /// City display name at observation time
    pub city_name: String,

    /// ISO country code
    pub country: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// Temperature in degrees Celsius
    pub temperature: f64,

    /// Perceived temperature in degrees Celsius
    pub feels_like: f64,

    /// Minimum observed temperature
    pub temp_min: f64,

    /// Maximum observed temperature
    pub temp_max: f64,

    /// Atmospheric pressure in hPa
    pub pressure: i32,

    /// Relative humidity percentage
    pub humidity: i32,

    /// Wind speed in m/s
    pub wind_speed: f64,

    /// Wind direction in degrees
    pub wind_direction: i32,

    /// Cloudiness percentage
    pub cloudiness: i32,

    /// Visibility in metres
    pub visibility: i32,

    /// Condition group (Rain, Snow, Clouds, ...)
    pub weather_main: String,

    /// Condition description within the group
    pub weather_description: String,

    /// Provider icon code
    pub weather_icon: String,

    /// Observation timestamp as reported by the provider
    #[schema(value_type = String, format = DateTime)]
    pub recorded_at: DateTimeWithTimeZone,

    /// Timestamp when the row was inserted
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
