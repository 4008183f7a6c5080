//! Shared target arguments and config resolution for CLI commands.

use crate::cli::error::HelpfulError;
use anyhow::{Context, Result};
use clap::Args;
use filecount::config::{resolve_folder, resolve_log_file};
use filecount::{DirectorySampler, FileConfig, LogStore, Mode, MonitorConfig, Overrides, StateHolder};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Folder and log file, from flags or the environment
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Folder to monitor (files directly inside it are counted)
    #[arg(short = 'f', long, env = "FILECOUNT_FOLDER")]
    pub folder: Option<PathBuf>,

    /// CSV log file [default: file_count_log.csv]
    #[arg(short = 'l', long, env = "FILECOUNT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl TargetArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            folder: self.folder.clone(),
            log_file: self.log_file.clone(),
            ..Default::default()
        }
    }
}

/// Load the `--config` file, or an empty config when none was given.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig, HelpfulError> {
    match path {
        Some(path) => Ok(FileConfig::load(path)?),
        None => Ok(FileConfig::default()),
    }
}

pub fn resolve(config_path: Option<&Path>, overrides: &Overrides, mode: Mode) -> Result<MonitorConfig, HelpfulError> {
    let file = load_file_config(config_path)?;
    Ok(MonitorConfig::resolve(&file, overrides, mode)?)
}

/// Folder and log file only, for commands that never schedule.
pub fn resolve_target(config_path: Option<&Path>, overrides: &Overrides) -> Result<(PathBuf, PathBuf), HelpfulError> {
    let file = load_file_config(config_path)?;
    Ok((resolve_folder(&file, overrides)?, resolve_log_file(&file, overrides)))
}

/// Open (creating if needed) the log and bind it to the folder.
pub fn open_state(folder: &Path, log_file: &Path) -> Result<Arc<StateHolder>> {
    let store = LogStore::open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    Ok(Arc::new(StateHolder::new(
        folder,
        Box::new(DirectorySampler::new()),
        store,
    )))
}

/// Multi-threaded runtime for the long-running commands.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
