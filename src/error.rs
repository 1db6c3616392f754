//! # Error Handling
//!
//! This module provides unified error handling for the WeatherHub API,
//! implementing a consistent problem+json response format with trace ID propagation.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::insights::InsightError;
use crate::provider::ProviderError;
use crate::repositories::StoreError;
use crate::telemetry;
use crate::transform::MalformedPayloadError;

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new<S: Into<String>>(status: StatusCode, code: S, message: S) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Extract current trace ID from the active tracing span (falls back to generated correlation ID)
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str())
            })
    }
}

/// Standard error types with predefined status codes
#[derive(Debug, Error)]
pub enum ErrorType {
    #[error("Bad Request")]
    BadRequest,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error")]
    InternalServerError,
    #[error("Bad Gateway")]
    BadGateway,
    #[error("Service Unavailable")]
    ServiceUnavailable,
}

impl ErrorType {
    /// Get the appropriate HTTP status code for this error type
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::BadGateway => StatusCode::BAD_GATEWAY,
            ErrorType::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorType::BadRequest => "VALIDATION_FAILED",
            ErrorType::Unauthorized => "UNAUTHORIZED",
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorType::BadGateway => "PROVIDER_ERROR",
            ErrorType::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        (self.status, headers, axum::Json(self)).into_response()
    }
}

// Error mappers for common sources

impl From<ErrorType> for ApiError {
    fn from(error_type: ErrorType) -> Self {
        Self::new(
            error_type.status_code(),
            error_type.error_code(),
            &error_type.to_string(),
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", error);

        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "An internal error occurred",
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(error: sea_orm::DbErr) -> Self {
        match error {
            sea_orm::DbErr::RecordNotFound(record) => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("Record not found: {}", record),
            ),
            sea_orm::DbErr::Conn(connection_err) => {
                tracing::error!("Database connection error: {:?}", connection_err);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service unavailable",
                )
            }
            other => {
                tracing::error!("Database error: {:?}", other);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Database error occurred",
                )
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Database(db_err) => db_err.into(),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::MissingSelector => Self::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "Provide a city name or a lat/lon pair",
            ),
            ProviderError::Unauthorized { .. } => Self::new(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Weather provider rejected the configured API key",
            ),
            ProviderError::Status { status, body } => {
                tracing::warn!(status, "Weather provider returned an error status");
                let mut err = Self::new(
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Weather provider returned an error",
                );
                if let Some(body) = body {
                    err = err.with_details(serde_json::json!({
                        "upstream_status": status,
                        "upstream_body": body,
                    }));
                }
                err
            }
            ProviderError::Timeout { timeout_seconds } => Self::new(
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                &format!(
                    "Weather provider did not respond within {timeout_seconds}s"
                ),
            ),
            ProviderError::Network { source } => {
                tracing::warn!(error = %source, "Weather provider request failed");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Weather provider is unreachable",
                )
            }
            ProviderError::MalformedBody { details } => {
                tracing::warn!(details = %details, "Weather provider returned a malformed body");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Weather provider returned an unusable response",
                )
            }
        }
    }
}

impl From<MalformedPayloadError> for ApiError {
    fn from(error: MalformedPayloadError) -> Self {
        tracing::warn!(error = %error, "Provider payload failed normalization");
        Self::new(
            StatusCode::BAD_GATEWAY,
            "PROVIDER_ERROR",
            "Weather provider returned an incomplete payload",
        )
    }
}

impl From<InsightError> for ApiError {
    fn from(error: InsightError) -> Self {
        match error {
            InsightError::NotConfigured => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Insights are not configured on this deployment",
            ),
            InsightError::NoData { city_id } => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("No weather observations stored for city {city_id}"),
            ),
            InsightError::Upstream { status, .. } => {
                tracing::warn!(status, "Insight model returned an error status");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Insight model returned an error",
                )
            }
            InsightError::Network { source } => {
                tracing::warn!(error = %source, "Insight request failed");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Insight model is unreachable",
                )
            }
            InsightError::MalformedReply { details } => {
                tracing::warn!(details = %details, "Insight model reply was unusable");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    "Insight model returned an unusable reply",
                )
            }
            InsightError::Store(store_err) => store_err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_unauthorized_maps_to_401() {
        let err: ApiError = ProviderError::Unauthorized { body: None }.into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(&*err.code, "UNAUTHORIZED");
    }

    #[test]
    fn provider_timeout_maps_to_bad_gateway() {
        let err: ApiError = ProviderError::Timeout { timeout_seconds: 10 }.into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(&*err.code, "PROVIDER_ERROR");
    }

    #[test]
    fn missing_selector_maps_to_validation_failure() {
        let err: ApiError = ProviderError::MissingSelector.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn insight_no_data_maps_to_404() {
        let err: ApiError = InsightError::NoData { city_id: 42 }.into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("42"));
    }
}
