//! API Module
//!
//! HTTP API layer for the build gateway.

pub mod build;
pub mod error;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Build endpoints
        .route("/api/build", post(build::trigger_build))
        // Add state and middleware
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::health::HealthResponse;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_without_token() {
        let base = test_support::spawn(create_router(AppState::new(Config::default()))).await;

        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), 200);

        let health: HealthResponse = response.json().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.service, health::SERVICE_NAME);
        assert_eq!(health.github_repo, "OWNER/REPO");
        assert!(!health.api_ready);
    }

    #[tokio::test]
    async fn test_health_with_token() {
        let config = Config::new(Some("ghp_abc".to_string()), "acme/apps".to_string());
        let base = test_support::spawn(create_router(AppState::new(config))).await;

        let health: HealthResponse = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health.github_repo, "acme/apps");
        assert!(health.api_ready);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let base = test_support::spawn(create_router(AppState::new(Config::default()))).await;

        let response = reqwest::Client::new()
            .get(format!("{}/health", base))
            .header("Origin", "https://app.example.com")
            .send()
            .await
            .unwrap();
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
