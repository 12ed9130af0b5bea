//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod trigger;
mod watch;

pub use trigger::TriggerArgs;
pub use watch::WatchArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Dispatch a build, optionally waiting for its artifact
    Trigger(TriggerArgs),
    /// Wait for the artifact of an already dispatched build
    Watch(WatchArgs),
}

/// Handle a CLI command
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Trigger(args) => trigger::handle_trigger(args, config).await,
        Commands::Watch(args) => watch::handle_watch(args, config).await,
    }
}
