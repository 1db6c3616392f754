//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the WeatherHub API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::db;
use crate::error::ApiError;
use crate::models::{HealthStatus, ServiceInfo};
use crate::server::AppState;

pub mod cities;
pub mod insights;
pub mod weather;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness probe that also verifies database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 503, description = "Database is unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    db::health_check(&state.db).await.map_err(|err| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE".to_string(),
            format!("Database connectivity check failed: {err}"),
        )
    })?;

    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        database: "ok".to_string(),
    }))
}
