//! # Repositories
//!
//! Data access layer over the sea-orm entities. Repositories borrow a
//! [`sea_orm::DatabaseConnection`] and expose the queries the handlers
//! and collector need; no query building leaks outside this module.

pub mod city;
pub mod weather_record;

use thiserror::Error;

pub use city::CityRepository;
pub use weather_record::{
    HistoricalQuery, WeatherAnalytics, WeatherRecordRepository,
};

/// Errors raised by repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database operation failed: {0}")]
    Database(#[from] sea_orm::DbErr),
}
