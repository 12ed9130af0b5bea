//! Trigger command handler
//!
//! Validates build parameters, dispatches the build workflow and, with
//! `--wait`, follows it to completion.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::*;
use shipwright_client::ClientError;
use shipwright_core::domain::build::BuildRequest;

use crate::commands::watch::{poller_config, wait_for_build};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Name of the app
    #[arg(long)]
    pub app_name: String,

    /// WebView URL
    #[arg(long)]
    pub url: String,

    /// Primary color (hex without #)
    #[arg(long)]
    pub color: String,

    /// User ID for APK naming
    #[arg(long)]
    pub user_id: String,

    /// Build ID for APK naming (auto-generated if not provided)
    #[arg(long)]
    pub build_id: Option<String>,

    /// Wait for the workflow to complete and print the download URL
    #[arg(long)]
    pub wait: bool,

    /// With --wait, stop waiting after this many seconds
    #[arg(long, value_name = "SECS", requires = "wait")]
    pub max_wait: Option<u64>,
}

pub async fn handle_trigger(args: TriggerArgs, config: &Config) -> Result<()> {
    let request = BuildRequest::new(
        args.app_name,
        args.url,
        args.color,
        args.user_id,
        args.build_id,
    )
    .map_err(|errors| anyhow!("Invalid build parameters: {}", errors.join("; ")))?;

    let result = match config.client().dispatch_workflow(&request).await {
        Ok(result) => result,
        Err(ClientError::DispatchRejected { status, body }) => {
            return Err(report_rejection(status, &body));
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "Workflow triggered successfully!".green().bold());
    println!("Build ID: {}", result.build_id.as_str().bold());

    if args.wait {
        wait_for_build(
            config,
            request.user_id(),
            &result.build_id,
            poller_config(args.max_wait),
        )
        .await
    } else {
        println!("Workflow triggered. Check GitHub Actions tab for progress and results.");
        println!("Expected APK name: {}", result.expected_filename());
        Ok(())
    }
}

/// Print GitHub's answer once and return a short error for the exit status
fn report_rejection(status: u16, body: &str) -> anyhow::Error {
    eprintln!(
        "{}",
        format!("Error triggering workflow: {}", status).red().bold()
    );
    eprintln!("{}", body);
    anyhow!("Workflow dispatch rejected")
}
