//! Shipwright build gateway
//!
//! HTTP facade that validates APK build requests and forwards them to GitHub
//! Actions as workflow dispatches.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod state;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipwright_server=debug,shipwright_client=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shipwright gateway...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        "Dispatching to {} via {}",
        config.github_repo,
        config.github_api_url
    );

    let addr = config.bind_addr();

    // Build router with all API endpoints
    let app = api::create_router(AppState::new(config));

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
