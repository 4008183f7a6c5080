//! `filecount config` - show the resolved configuration and paths.

use crate::cli::context::{self, TargetArgs};
use crate::cli::error::HelpfulError;
use crate::cli::output::format_interval;
use anyhow::Result;
use clap::Args;
use filecount::config::{resolve_host, resolve_interval, resolve_log_file, resolve_port};
use filecount::{Mode, Overrides};
use std::path::Path;

/// Arguments for the config command
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Sampling interval to resolve, as `watch` and `serve` would take it
    #[arg(short, long, env = "FILECOUNT_INTERVAL")]
    pub interval: Option<String>,

    /// Address `serve` would bind
    #[arg(long, env = "FILECOUNT_HOST")]
    pub host: Option<String>,

    /// Port `serve` would bind
    #[arg(short, long, env = "FILECOUNT_PORT")]
    pub port: Option<u16>,

    /// Show resolved settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the config command - shows resolved settings
pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let file = context::load_file_config(config_path)?;
    let overrides = Overrides {
        interval: args.interval.clone(),
        host: args.host.clone(),
        port: args.port,
        ..args.target.overrides()
    };

    let log_file = resolve_log_file(&file, &overrides);
    let watch_interval = resolve_interval(&file, &overrides, Mode::Watch).map_err(HelpfulError::from)?;
    let serve_interval = resolve_interval(&file, &overrides, Mode::Serve).map_err(HelpfulError::from)?;
    let folder = overrides.folder.clone().or_else(|| file.monitor.folder.clone());
    let host = resolve_host(&file, &overrides);
    let port = resolve_port(&file, &overrides);
    let logs = filecount_logging::logs_dir();

    if args.json {
        let config = serde_json::json!({
            "config_file": config_path.map(|p| p.to_string_lossy().to_string()),
            "folder": folder.as_ref().map(|p| p.to_string_lossy().to_string()),
            "folder_exists": folder.as_ref().map(|p| p.is_dir()),
            "log_file": {
                "path": log_file.to_string_lossy(),
                "exists": log_file.exists(),
            },
            "watch_interval_secs": watch_interval.as_secs_f64(),
            "serve_interval_secs": serve_interval.as_secs_f64(),
            "server": {
                "host": host,
                "port": port,
            },
            "logs_dir": logs.to_string_lossy(),
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("FILECOUNT CONFIGURATION");
        println!("=======================");
        println!();
        match &folder {
            Some(folder) => println!(
                "Folder:         {} ({})",
                folder.display(),
                if folder.is_dir() { "exists" } else { "not found" }
            ),
            None => println!("Folder:         (not set)"),
        }
        println!(
            "Log file:       {} ({})",
            log_file.display(),
            if log_file.exists() { "exists" } else { "not found" }
        );
        println!("Watch interval: {}", format_interval(watch_interval));
        println!("Serve interval: {}", format_interval(serve_interval));
        println!("Server:         http://{}:{}", host, port);
        println!();
        println!("Logs:           {}", logs.display());
    }

    Ok(())
}
