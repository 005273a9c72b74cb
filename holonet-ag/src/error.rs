//! Error types for holonet-ag HTTP handlers

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown route or id (404)
    #[error("not found")]
    NotFound,

    /// Query string that does not decode, e.g. a repeated `page` (400)
    #[error("invalid query: {}", .0.body_text())]
    BadQuery(#[from] QueryRejection),

    /// Fetch, shape or other failure while serving the request (500)
    #[error(transparent)]
    Common(#[from] holonet_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Common(ref err) => {
                tracing::warn!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
