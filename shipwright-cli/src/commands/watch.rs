//! Watch command handler
//!
//! Polls GitHub Actions until a dispatched build's artifact is ready.

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use shipwright_client::{CompletionPoller, PollOutcome, PollerConfig};
use shipwright_core::domain::build::artifact_name;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// User ID the build was dispatched for
    #[arg(long)]
    pub user_id: String,

    /// Build ID returned by the dispatch
    #[arg(long)]
    pub build_id: String,

    /// Stop waiting after this many seconds (waits indefinitely by default)
    #[arg(long, value_name = "SECS")]
    pub max_wait: Option<u64>,

    /// Check immediately instead of giving GitHub time to register the run
    #[arg(long)]
    pub skip_warmup: bool,
}

pub async fn handle_watch(args: WatchArgs, config: &Config) -> Result<()> {
    let mut poller_config = poller_config(args.max_wait);
    if args.skip_warmup {
        poller_config.warmup = Duration::ZERO;
    }

    wait_for_build(config, &args.user_id, &args.build_id, poller_config).await
}

pub(crate) fn poller_config(max_wait: Option<u64>) -> PollerConfig {
    PollerConfig {
        max_wait: max_wait.map(Duration::from_secs),
        ..Default::default()
    }
}

/// Poll for the build's artifact and report the outcome
///
/// Anything other than a downloadable artifact is an error.
pub(crate) async fn wait_for_build(
    config: &Config,
    user_id: &str,
    build_id: &str,
    poller_config: PollerConfig,
) -> Result<()> {
    println!("{}", "Waiting for workflow to complete...".cyan());

    let poller = CompletionPoller::new(Arc::new(config.client()), poller_config);
    let artifact = artifact_name(user_id, build_id);

    match poller.wait_for_artifact(&artifact).await {
        PollOutcome::Succeeded { download_url } => {
            println!("{}", "Workflow completed successfully!".green().bold());
            println!("Download URL: {}", download_url);
            println!("Note: You'll need to use the same GitHub token to download the artifact.");
            println!();
            println!("To download the APK, use the following command:");
            println!("{}", curl_command(&artifact, &download_url));
            Ok(())
        }
        PollOutcome::Failed { conclusion } => {
            let conclusion = conclusion
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            bail!("Workflow failed with conclusion: {}", conclusion)
        }
        PollOutcome::NotFound => {
            bail!("Workflow did not complete successfully or artifacts not found.")
        }
        PollOutcome::TimedOut => bail!("Timed out waiting for artifact {}", artifact),
    }
}

fn curl_command(artifact: &str, download_url: &str) -> String {
    format!(
        "curl -L -H 'Authorization: token YOUR_TOKEN' -o {}.apk {}",
        artifact, download_url
    )
}
