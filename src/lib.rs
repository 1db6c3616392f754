//! # WeatherHub
//!
//! Scheduled weather data collection with an HTTP API on top. A background
//! scheduler drives a fetch-transform-store pipeline over a tracked city
//! set; axum handlers expose the stored observations, window analytics and
//! chat-model generated insights.

pub mod collector;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod provider;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub mod transform;

pub use migration;
