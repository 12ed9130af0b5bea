//! Shipwright GitHub Actions client
//!
//! A small, typed client for the three GitHub Actions endpoints the build
//! gateway needs: workflow dispatch, the repository run list, and a run's
//! artifact list. The [`CompletionPoller`] builds on the two query endpoints
//! to wait for a dispatched build's artifact.
//!
//! # Example
//!
//! ```no_run
//! use shipwright_client::GithubClient;
//! use shipwright_core::domain::build::BuildRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GithubClient::new("owner/repo", "ghp_token");
//!     let request = BuildRequest::new("My App", "https://example.com", "FF5722", "user123", None)
//!         .map_err(|errors| errors.join(", "))?;
//!
//!     let result = client.dispatch_workflow(&request).await?;
//!     println!("Dispatched build {}", result.build_id);
//!     Ok(())
//! }
//! ```

mod dispatch;
pub mod error;
pub mod poller;
mod runs;

pub use dispatch::{BUILD_WORKFLOW_FILE, DEFAULT_REF, DispatchInputs, WorkflowDispatch};
pub use error::{ClientError, Result};
pub use poller::{BUILD_WORKFLOW_NAME, CompletionPoller, PollOutcome, PollerConfig};
pub use runs::WorkflowApi;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT_HEADER: &str = concat!("shipwright/", env!("CARGO_PKG_VERSION"));

/// HTTP client for one repository's GitHub Actions API
#[derive(Clone)]
pub struct GithubClient {
    /// Base URL of the REST API (e.g., "https://api.github.com")
    api_base_url: String,
    /// Repository in `owner/name` form
    repo: String,
    /// Personal access token with `repo` scope
    token: String,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base_url", &self.api_base_url)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Create a client against the public GitHub API
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_api_url(DEFAULT_API_URL, repo, token)
    }

    /// Create a client against a custom API base URL (GitHub Enterprise, stubs)
    pub fn with_api_url(
        api_base_url: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::with_client(api_base_url, repo, token, Client::new())
    }

    /// Create a client with a configured reqwest Client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        api_base_url: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let api_base_url = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            repo: repo.into(),
            token: token.into(),
            client,
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base_url, self.repo, path)
    }

    /// Attach the headers every GitHub call needs
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, ACCEPT_HEADER)
            .header(USER_AGENT, USER_AGENT_HEADER)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Require a 200 response and deserialize its JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
