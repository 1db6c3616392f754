//! # City API Handlers

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::city::Model as CityModel;
use crate::repositories::CityRepository;
use crate::server::AppState;

/// Query parameters for city search
#[derive(Debug, Deserialize, IntoParams)]
pub struct CitySearchQuery {
    /// Name fragment to match, case-insensitive
    pub q: String,
}

/// All known cities ordered by name.
#[utoipa::path(
    get,
    path = "/cities",
    responses(
        (status = 200, description = "Known cities", body = [CityModel])
    ),
    tag = "cities"
)]
pub async fn list_cities(State(state): State<AppState>) -> Result<Json<Vec<CityModel>>, ApiError> {
    let cities = CityRepository::new(&state.db).list_all().await?;
    Ok(Json(cities))
}

/// Case-insensitive substring search over city names, capped at ten rows.
#[utoipa::path(
    get,
    path = "/cities/search",
    params(CitySearchQuery),
    responses(
        (status = 200, description = "Matching cities", body = [CityModel]),
        (status = 400, description = "Empty search fragment", body = ApiError)
    ),
    tag = "cities"
)]
pub async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<CitySearchQuery>,
) -> Result<Json<Vec<CityModel>>, ApiError> {
    let fragment = query.q.trim();
    if fragment.is_empty() {
        return Err(ApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "q must not be empty",
        ));
    }

    let cities = CityRepository::new(&state.db).search(fragment).await?;
    Ok(Json(cities))
}
