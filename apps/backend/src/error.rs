//! Application error types for the movie search backend.
//!
//! Provides a unified error type that implements `IntoResponse` for Axum.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use omdb_search::SearchError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading/parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The upstream movie database failed
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidArgument(msg) => AppError::BadRequest(msg),
            SearchError::RemoteService(cause) => AppError::ServiceUnavailable(format!(
                "OMDB API does not work correctly. Original message: {}",
                cause
            )),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                // Client-caused, safe to expose
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    Some(msg.clone()),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use omdb_search::RemoteError;

    #[test]
    fn test_bad_request_status() {
        let error = AppError::BadRequest("invalid".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_status() {
        let error = AppError::Internal("boom".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_argument_maps_to_bad_request() {
        let error: AppError = SearchError::InvalidArgument("title is required".to_string()).into();
        assert!(matches!(error, AppError::BadRequest(_)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_remote_failure_maps_to_service_unavailable() {
        let error: AppError =
            SearchError::RemoteService(RemoteError::Rejected("Invalid API key!".to_string()))
                .into();

        match &error {
            AppError::ServiceUnavailable(msg) => {
                assert!(msg.starts_with("OMDB API does not work correctly."));
                assert!(msg.contains("Invalid API key!"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            error.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
