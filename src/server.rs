//! # Server Configuration
//!
//! This module contains the server setup and configuration for the WeatherHub API.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::insights::InsightsService;
use crate::provider::OpenWeatherClient;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub weather: OpenWeatherClient,
    pub insights: InsightsService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        let weather = OpenWeatherClient::new(&config);
        let insights = InsightsService::new(&config);
        Self {
            db,
            config,
            weather,
            insights,
        }
    }
}

/// Middleware that scopes each request to a fresh trace context so log lines
/// and error payloads carry a correlation id.
async fn trace_context_middleware(request: Request<Body>, next: Next) -> Response {
    telemetry::with_trace_context(TraceContext::for_request(), next.run(request)).await
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/weather/current", get(handlers::weather::current_weather))
        .route(
            "/weather/forecast",
            get(handlers::weather::weather_forecast),
        )
        .route(
            "/weather/latest",
            get(handlers::weather::latest_weather_all),
        )
        .route(
            "/weather/latest/{city_id}",
            get(handlers::weather::latest_weather),
        )
        .route(
            "/weather/historical/{city_id}",
            get(handlers::weather::historical_weather),
        )
        .route(
            "/weather/analytics/{city_id}",
            get(handlers::weather::weather_analytics),
        )
        .route("/cities", get(handlers::cities::list_cities))
        .route("/cities/search", get(handlers::cities::search_cities))
        .route("/insights/ai", post(handlers::insights::ai_insight))
        .route(
            "/insights/summary/{city_id}",
            get(handlers::insights::daily_summary),
        )
        .route(
            "/insights/clothing/{city_id}",
            get(handlers::insights::clothing_recommendation),
        )
        .layer(axum::middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration, shutting down gracefully
/// when the provided future resolves.
pub async fn run_server(
    config: Arc<AppConfig>,
    db: DatabaseConnection,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = AppState::new(db, config.clone());
    let app = create_app(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, profile = %config.profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::weather::current_weather,
        crate::handlers::weather::weather_forecast,
        crate::handlers::weather::latest_weather,
        crate::handlers::weather::latest_weather_all,
        crate::handlers::weather::historical_weather,
        crate::handlers::weather::weather_analytics,
        crate::handlers::cities::list_cities,
        crate::handlers::cities::search_cities,
        crate::handlers::insights::ai_insight,
        crate::handlers::insights::daily_summary,
        crate::handlers::insights::clothing_recommendation,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::HealthStatus,
            crate::models::city::Model,
            crate::models::weather_record::Model,
            crate::provider::CurrentConditions,
            crate::provider::Forecast,
            crate::repositories::WeatherAnalytics,
            crate::insights::Insight,
            crate::handlers::insights::InsightRequest,
            crate::error::ApiError,
        )
    ),
    info(
        title = "WeatherHub API",
        description = "Weather data collection, storage and insights",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
