//! Append-only CSV history of samples.
//!
//! The file starts with a fixed header line and then holds one
//! `timestamp,folder,count` line per sample, oldest first. Nothing in this
//! crate ever rewrites or deletes a line.
//!
//! Folder paths are written unescaped, so a folder containing commas produces
//! a line with more than three comma-separated fields. Reading takes the
//! timestamp up to the first comma and the count after the last comma, which
//! keeps such folders intact.

use crate::sample::Sample;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, error, info};

/// First line of every log file.
pub const LOG_HEADER: &str = "Timestamp,Folder,File Count";

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "file_count_log.csv";

/// Errors from the durable log.
#[derive(Error, Debug)]
pub enum LogStoreError {
    #[error("Failed to create log file '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to append to log file '{}': {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read log file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to acquire log file lock")]
    LockError,
}

/// Create the log file with only the header line if it does not exist yet.
///
/// An existing file is left untouched whatever it contains. Returns `true`
/// when the file was created by this call.
pub fn ensure_initialized(path: &Path) -> Result<bool, LogStoreError> {
    if path.exists() {
        return Ok(false);
    }

    let create_err = |source: io::Error| LogStoreError::Create {
        path: path.to_path_buf(),
        source,
    };

    // create_new closes the window between the exists() check and the write
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(create_err(err)),
    };
    file.write_all(format!("{}\n", LOG_HEADER).as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(create_err)?;

    info!("Created log file: {}", path.display());
    Ok(true)
}

/// Serialize a sample as one log line, without the trailing newline.
pub fn format_line(sample: &Sample) -> String {
    format!("{},{},{}", sample.timestamp, sample.folder, sample.count)
}

/// Parse one log line. Returns `None` for malformed records.
pub fn parse_line(line: &str) -> Option<Sample> {
    let line = line.trim_end_matches('\r');
    let (timestamp, rest) = line.split_once(',')?;
    let (folder, count) = rest.rsplit_once(',')?;
    let count = count.trim().parse::<u64>().ok()?;

    Some(Sample {
        timestamp: timestamp.to_string(),
        folder: folder.to_string(),
        count,
    })
}

/// Durable, append-only CSV log of samples.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LogStore {
    /// Open the log at `path`, creating it with the header if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogStoreError> {
        let path = path.into();
        ensure_initialized(&path)?;
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one sample line and sync it to disk before returning.
    ///
    /// The file is opened without `create`: if it vanished after `open`, the
    /// append fails instead of silently starting a headerless log.
    pub fn append(&self, sample: &Sample) -> Result<(), LogStoreError> {
        let _guard = self.write_lock.lock().map_err(|_| LogStoreError::LockError)?;

        let append_err = |source: io::Error| LogStoreError::Append {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(append_err)?;
        let line = format!("{}\n", format_line(sample));
        file.write_all(line.as_bytes()).map_err(append_err)?;
        file.sync_data().map_err(append_err)?;
        Ok(())
    }

    /// Last `n` well-formed samples in chronological order.
    pub fn try_tail(&self, n: usize) -> Result<Vec<Sample>, LogStoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| LogStoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let mut skipped = 0usize;
        let samples: Vec<Sample> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .skip(1)
            .filter_map(|line| {
                let parsed = parse_line(line);
                if parsed.is_none() {
                    skipped += 1;
                    debug!("Skipping malformed log line: {:?}", line);
                }
                parsed
            })
            .collect();

        if skipped > 0 {
            debug!("Skipped {} malformed line(s) in {}", skipped, self.path.display());
        }

        let start = samples.len().saturating_sub(n);
        Ok(samples[start..].to_vec())
    }

    /// Like [`LogStore::try_tail`], but a read failure is logged and yields
    /// an empty history.
    pub fn tail(&self, n: usize) -> Vec<Sample> {
        match self.try_tail(n) {
            Ok(samples) => samples,
            Err(err) => {
                error!("Error reading history: {}", err);
                Vec::new()
            }
        }
    }
}
