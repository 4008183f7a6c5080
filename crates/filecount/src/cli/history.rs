//! `filecount history` - print the most recent samples from the log.

use crate::cli::context::{self, TargetArgs};
use crate::cli::error::HelpfulError;
use crate::cli::output::print_table;
use anyhow::Result;
use clap::Args;
use filecount::config::resolve_log_file;
use filecount::LogStore;
use std::path::Path;

/// Arguments for the `history` command
#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of samples to show
    #[arg(short = 'n', long, default_value = "24")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: HistoryArgs, config_path: Option<&Path>) -> Result<()> {
    let file = context::load_file_config(config_path)?;
    let log_file = resolve_log_file(&file, &args.target.overrides());

    // reading must not create an empty log as a side effect
    if !log_file.exists() {
        return Err(HelpfulError::log_not_found(&log_file).into());
    }
    let samples = LogStore::open(&log_file)?.tail(args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    if samples.is_empty() {
        println!("No samples recorded in {}", log_file.display());
        return Ok(());
    }

    let rows = samples
        .into_iter()
        .map(|s| vec![s.timestamp, s.folder, s.count.to_string()])
        .collect();
    print_table(&["Timestamp", "Folder", "Files"], rows);
    Ok(())
}
