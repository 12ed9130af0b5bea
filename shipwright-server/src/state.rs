//! Shared handler state

use shipwright_client::GithubClient;
use std::sync::Arc;

use crate::config::Config;

/// Immutable state shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Present only when a token is configured
    pub github: Option<GithubClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let github = config.github_token.as_ref().map(|token| {
            GithubClient::with_api_url(
                config.github_api_url.clone(),
                config.github_repo.clone(),
                token.clone(),
            )
        });

        Self {
            config: Arc::new(config),
            github,
        }
    }
}
