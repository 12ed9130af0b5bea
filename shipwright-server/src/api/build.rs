//! Build API Handlers
//!
//! Validates build requests and dispatches them to GitHub Actions.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shipwright_core::domain::build::BuildRequest;

use crate::api::error::{ApiError, ApiResult};
use crate::config::Config;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Body returned for an accepted build
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResponse {
    pub status: String,
    pub message: String,
    pub build_id: String,
    pub user_id: String,
    pub expected_filename: String,
    pub check_status_url: String,
}

/// POST /api/build
/// Trigger an APK build
pub async fn trigger_build(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<BuildResponse>> {
    check_api_key(&state.config, &headers)?;

    let github = state.github.as_ref().ok_or_else(|| {
        ApiError::Configuration("GitHub token not configured on server".to_string())
    })?;

    let body = parse_body(&body)?;
    let req = BuildRequest::from_body(&body).map_err(ApiError::Validation)?;

    tracing::info!(
        "Dispatching build {} for user {} ({})",
        req.build_id(),
        req.user_id(),
        req.app_name()
    );

    let result = github.dispatch_workflow(&req).await?;

    Ok(Json(BuildResponse {
        status: "success".to_string(),
        message: "Build triggered successfully".to_string(),
        expected_filename: result.expected_filename(),
        build_id: result.build_id,
        user_id: req.user_id().to_string(),
        check_status_url: state.config.check_status_url(),
    }))
}

/// Enforce the shared secret when one is configured
fn check_api_key(config: &Config, headers: &HeaderMap) -> ApiResult<()> {
    let Some(expected) = config.api_key.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == expected => Ok(()),
        _ => {
            tracing::warn!("Rejected build request with invalid or missing API key");
            Err(ApiError::Unauthorized)
        }
    }
}

/// The body must be a non-empty JSON object
fn parse_body(body: &[u8]) -> ApiResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(ApiError::BadRequest("No JSON data provided".to_string())),
    }
}
