//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shipwright_client::ClientError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// `X-API-Key` missing or wrong
    Unauthorized,
    /// Server is missing a required secret
    Configuration(String),
    BadRequest(String),
    /// Request body failed validation, one message per problem
    Validation(Vec<String>),
    /// GitHub rejected the dispatch or could not be reached
    DispatchFailed(ClientError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "Invalid or missing API key" }),
            ),
            ApiError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": msg }),
                )
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Validation failed", "details": details }),
            ),
            ApiError::DispatchFailed(err) => {
                tracing::error!("Dispatch error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "error": "Failed to trigger build",
                        "details": err.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::DispatchFailed(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
