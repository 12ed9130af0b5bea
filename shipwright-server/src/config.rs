//! Server configuration
//!
//! Read once from the environment at startup and shared read-only with every
//! handler. Empty variables are treated as unset.

use anyhow::Context;
use shipwright_client::DEFAULT_API_URL;

/// Repository used when `GITHUB_REPO` is not set
pub const PLACEHOLDER_REPO: &str = "OWNER/REPO";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_WEB_URL: &str = "https://github.com";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Personal access token used for dispatches; the API is not ready without it
    pub github_token: Option<String>,

    /// Repository in `owner/name` form
    pub github_repo: String,

    /// Shared secret expected in `X-API-Key`, if any
    pub api_key: Option<String>,

    /// Interface to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// GitHub REST API base URL
    pub github_api_url: String,

    /// GitHub web base URL, used for the status link returned to clients
    pub github_web_url: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(github_token: Option<String>, github_repo: String) -> Self {
        Self {
            github_token,
            github_repo,
            api_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            github_api_url: DEFAULT_API_URL.to_string(),
            github_web_url: DEFAULT_WEB_URL.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GITHUB_TOKEN (optional, required for builds)
    /// - GITHUB_REPO (optional, default: OWNER/REPO)
    /// - API_KEY (optional)
    /// - BIND_HOST (optional, default: 0.0.0.0)
    /// - PORT (optional, default: 5000)
    /// - GITHUB_API_URL (optional, default: https://api.github.com)
    /// - GITHUB_WEB_URL (optional, default: https://github.com)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            github_token: var("GITHUB_TOKEN"),
            github_repo: var("GITHUB_REPO").unwrap_or_else(|| PLACEHOLDER_REPO.to_string()),
            api_key: var("API_KEY"),
            host: var("BIND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            github_api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            github_web_url: var("GITHUB_WEB_URL").unwrap_or_else(|| DEFAULT_WEB_URL.to_string()),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("github_api_url", &self.github_api_url),
            ("github_web_url", &self.github_web_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if !self.github_repo.contains('/') {
            anyhow::bail!("github_repo must be in owner/name form");
        }

        Ok(())
    }

    /// Whether builds can be dispatched
    pub fn api_ready(&self) -> bool {
        self.github_token.is_some()
    }

    /// Problems worth reporting at startup that do not prevent serving
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.github_token.is_none() {
            warnings.push("GITHUB_TOKEN environment variable not set. API will not function correctly.");
        }
        if self.github_repo == PLACEHOLDER_REPO {
            warnings.push("GITHUB_REPO environment variable not set. Using default placeholder value.");
        }
        warnings
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where a client can follow the repository's workflow runs
    pub fn check_status_url(&self) -> String {
        format!(
            "{}/{}/actions",
            self.github_web_url.trim_end_matches('/'),
            self.github_repo
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, PLACEHOLDER_REPO.to_string())
    }
}
