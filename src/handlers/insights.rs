//! # Insight API Handlers
//!
//! Endpoints that turn stored observations into natural-language commentary.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::insights::{Insight, InsightKind};
use crate::server::AppState;

/// Request body for a free-form insight
#[derive(Debug, Deserialize, ToSchema)]
pub struct InsightRequest {
    /// Provider city identifier
    pub city_id: i64,
    /// Optional free-text question about the weather
    pub query: Option<String>,
}

/// Free-form weather insight for a city.
#[utoipa::path(
    post,
    path = "/insights/ai",
    request_body = InsightRequest,
    responses(
        (status = 200, description = "Generated insight", body = Insight),
        (status = 404, description = "No observations stored for this city", body = ApiError),
        (status = 502, description = "Insight model failure", body = ApiError),
        (status = 503, description = "Insights not configured", body = ApiError)
    ),
    tag = "insights"
)]
pub async fn ai_insight(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<Insight>, ApiError> {
    let insight = state
        .insights
        .generate(
            &state.db,
            request.city_id,
            InsightKind::General,
            request.query.as_deref(),
        )
        .await?;
    Ok(Json(insight))
}

/// Short daily weather summary for a city.
#[utoipa::path(
    get,
    path = "/insights/summary/{city_id}",
    params(
        ("city_id" = i64, Path, description = "Provider city identifier")
    ),
    responses(
        (status = 200, description = "Daily summary", body = Insight),
        (status = 404, description = "No observations stored for this city", body = ApiError),
        (status = 502, description = "Insight model failure", body = ApiError),
        (status = 503, description = "Insights not configured", body = ApiError)
    ),
    tag = "insights"
)]
pub async fn daily_summary(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<Insight>, ApiError> {
    let insight = state
        .insights
        .generate(&state.db, city_id, InsightKind::DailySummary, None)
        .await?;
    Ok(Json(insight))
}

/// Clothing recommendation based on current conditions.
#[utoipa::path(
    get,
    path = "/insights/clothing/{city_id}",
    params(
        ("city_id" = i64, Path, description = "Provider city identifier")
    ),
    responses(
        (status = 200, description = "Clothing recommendation", body = Insight),
        (status = 404, description = "No observations stored for this city", body = ApiError),
        (status = 502, description = "Insight model failure", body = ApiError),
        (status = 503, description = "Insights not configured", body = ApiError)
    ),
    tag = "insights"
)]
pub async fn clothing_recommendation(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<Insight>, ApiError> {
    let insight = state
        .insights
        .generate(&state.db, city_id, InsightKind::Clothing, None)
        .await?;
    Ok(Json(insight))
}
