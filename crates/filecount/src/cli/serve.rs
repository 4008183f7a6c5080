//! `filecount serve` - JSON API plus background sampling.

use crate::cli::context::{self, TargetArgs};
use crate::cli::output::format_interval;
use crate::cli::shutdown::ShutdownSignal;
use anyhow::{Context, Result};
use clap::Args;
use filecount::{server, Mode, Overrides, Scheduler, ServerConfig};
use std::path::Path;
use tracing::{info, warn};

/// Arguments for the `serve` command
#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Time between background samples [default: 30s]
    #[arg(short, long, env = "FILECOUNT_INTERVAL")]
    pub interval: Option<String>,

    /// Address to bind [default: 127.0.0.1]
    #[arg(long, env = "FILECOUNT_HOST")]
    pub host: Option<String>,

    /// Port to bind [default: 3000]
    #[arg(short, long, env = "FILECOUNT_PORT")]
    pub port: Option<u16>,
}

pub fn run(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = Overrides {
        interval: args.interval.clone(),
        host: args.host.clone(),
        port: args.port,
        ..args.target.overrides()
    };
    let config = context::resolve(config_path, &overrides, Mode::Serve)?;
    let state = context::open_state(&config.folder, &config.log_file)?;

    context::runtime()?.block_on(async move {
        let signal = ShutdownSignal::install().context("Failed to install signal handlers")?;

        let server_config = ServerConfig {
            host: config.host.clone(),
            port: config.port,
        };
        let (server, server_handle) = server::bind(&server_config, state.clone())
            .with_context(|| format!("Failed to bind {}", server_config.addr()))?;

        let (scheduler, scheduler_handle) = Scheduler::new(state, config.interval);
        let scheduler_join = scheduler.spawn();

        println!("File counter running at http://{}", server_config.addr());
        println!("Monitoring: {}", config.folder.display());
        println!("Sampling every {}", format_interval(config.interval));
        println!("Press Ctrl+C to stop");

        // the server future processes its own stop command, so it must keep
        // being polled while the handle waits for it
        let mut server_task = tokio::spawn(server);
        tokio::select! {
            result = &mut server_task => {
                warn!("HTTP server exited on its own");
                scheduler_handle.stop();
                scheduler_join.await.context("Scheduler task failed")?;
                result.context("HTTP server task failed")?.context("HTTP server failed")?;
            }
            name = signal.recv() => {
                info!("Received {}, stopping...", name);
                scheduler_handle.stop();
                server_handle.stop(true).await;
                server_task
                    .await
                    .context("HTTP server task failed")?
                    .context("HTTP server failed")?;
                scheduler_join.await.context("Scheduler task failed")?;
            }
        }

        println!("Stopped.");
        Ok::<(), anyhow::Error>(())
    })
}
