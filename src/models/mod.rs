//! # Data Models
//!
//! This module contains the SeaORM entities and shared response models used
//! throughout the WeatherHub service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod city;
pub mod weather_record;

pub use city::Entity as City;
pub use weather_record::Entity as WeatherRecord;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "weatherhub".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness and database connectivity report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Overall service status
    pub status: String,
    /// Database connectivity status
    pub database: String,
}
