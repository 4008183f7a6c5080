//! filecount launcher
//!
//! - **once**: one sample, console line, exit (cron-style)
//! - **watch**: sample on an interval, console output, stop on SIGINT/SIGTERM
//! - **serve**: JSON API plus background sampling, stop on SIGINT/SIGTERM
//! - **history** / **config**: read-only inspection

use anyhow::Result;
use clap::{Parser, Subcommand};
use filecount_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(
    name = "filecount",
    version,
    about = "Count the files in a folder and keep a CSV history"
)]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// TOML config file with [monitor] and [server] sections
    #[arg(short = 'c', long, global = true, env = "FILECOUNT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take one sample, append it to the log, and exit
    Once(cli::once::OnceArgs),

    /// Sample on a fixed interval until interrupted
    Watch(cli::watch::WatchArgs),

    /// Serve the JSON API while sampling in the background
    Serve(cli::serve::ServeArgs),

    /// Show the most recent samples from the log
    History(cli::history::HistoryArgs),

    /// Show the resolved configuration
    Config(cli::config::ConfigArgs),
}

fn run_command(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Once(args) => cli::once::run(args, config),
        Commands::Watch(args) => cli::watch::run(args, config),
        Commands::Serve(args) => cli::serve::run(args, config),
        Commands::History(args) => cli::history::run(args, config),
        Commands::Config(args) => cli::config::run(args, config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = init_logging(LogConfig {
        app_name: "filecount",
        verbose: cli.verbose,
    });

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
