//! Shipwright CLI
//!
//! Dispatches APK builds to GitHub Actions directly, without the gateway,
//! and optionally waits for the resulting artifact.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shipwright")]
#[command(about = "Trigger WebView APK builds via GitHub Actions", long_about = None)]
struct Cli {
    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// GitHub repository in format owner/repo
    #[arg(long, env = "GITHUB_REPO", default_value = "OWNER/REPO")]
    repo: String,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = shipwright_client::DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipwright_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        token: cli.token,
        repo: cli.repo,
        api_url: cli.api_url,
    };

    handle_command(cli.command, &config).await
}
