//! Configuration module
//!
//! Connection settings shared by every command.

use shipwright_client::GithubClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub personal access token with `repo` scope
    pub token: String,
    /// Repository in `owner/name` form
    pub repo: String,
    /// GitHub REST API base URL
    pub api_url: String,
}

impl Config {
    pub fn client(&self) -> GithubClient {
        GithubClient::with_api_url(&self.api_url, &self.repo, &self.token)
    }
}
