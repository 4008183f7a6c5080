//! `filecount once` - take a single sample and exit (cron-style).

use crate::cli::context::{self, TargetArgs};
use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

/// Arguments for the `once` command
#[derive(Debug, Args)]
pub struct OnceArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn run(args: OnceArgs, config_path: Option<&Path>) -> Result<()> {
    let (folder, log_file) = context::resolve_target(config_path, &args.target.overrides())?;
    let state = context::open_state(&folder, &log_file)?;

    println!("Running file count...");
    let sample = state
        .sample_once()
        .with_context(|| format!("Failed to record sample in {}", log_file.display()))?;
    println!("{}", sample.describe());
    Ok(())
}
