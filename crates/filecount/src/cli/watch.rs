//! `filecount watch` - sample on a fixed interval until interrupted.

use crate::cli::context::{self, TargetArgs};
use crate::cli::output::format_interval;
use crate::cli::shutdown::ShutdownSignal;
use anyhow::{Context, Result};
use clap::Args;
use filecount::{Mode, Overrides, Scheduler};
use std::path::Path;
use tracing::info;

/// Arguments for the `watch` command
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Time between samples, e.g. 30s, 15m, 1h [default: 1h]
    #[arg(short, long, env = "FILECOUNT_INTERVAL")]
    pub interval: Option<String>,
}

pub fn run(args: WatchArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = Overrides {
        interval: args.interval.clone(),
        ..args.target.overrides()
    };
    let config = context::resolve(config_path, &overrides, Mode::Watch)?;
    let state = context::open_state(&config.folder, &config.log_file)?;

    println!("Starting file counter...");
    println!("Monitoring: {}", config.folder.display());
    println!("Logging to: {}", config.log_file.display());
    println!("Checking every {}", format_interval(config.interval));
    println!("Press Ctrl+C to stop");
    println!();

    context::runtime()?.block_on(async move {
        let signal = ShutdownSignal::install().context("Failed to install signal handlers")?;

        let (scheduler, handle) = Scheduler::new(state, config.interval);
        let join = scheduler
            .on_sample(|sample| println!("{}", sample.describe()))
            .spawn();

        let name = signal.recv().await;
        info!("Received {}, stopping...", name);
        println!("\nStopping file counter...");
        handle.stop();
        join.await.context("Scheduler task failed")?;
        Ok::<(), anyhow::Error>(())
    })
}
