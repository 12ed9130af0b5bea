//! Health Check API Handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "WebView APK Generator API";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub github_repo: String,
    pub api_ready: bool,
}

/// GET /health
/// Reports whether the gateway can dispatch builds
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        github_repo: state.config.github_repo.clone(),
        api_ready: state.config.api_ready(),
    })
}
