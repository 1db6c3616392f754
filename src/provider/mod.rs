//! Weather provider integration
//!
//! HTTP client and raw payload types for the upstream current-conditions
//! and forecast endpoints. The client performs single bounded-timeout
//! requests and maps failures into [`ProviderError`]; retry policy belongs
//! to callers (in practice, the next scheduled collection tick).

pub mod client;
pub mod types;

pub use client::{OpenWeatherClient, ProviderError, WeatherQuery};
pub use types::{CurrentConditions, Forecast};
