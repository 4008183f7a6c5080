//! Non-recursive regular-file counting for the monitored folder.
//!
//! Sampling is fail-soft: a missing folder or any I/O error is logged and
//! counted as zero so the monitoring loop never stops on a bad read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

/// Errors raised while enumerating a folder.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Folder '{}' does not exist", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Failed to read folder '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to stat '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of file counts for a folder.
pub trait Sampler: Send + Sync {
    /// Count regular files directly inside `folder`, substituting `0` on failure.
    fn count(&self, folder: &Path) -> u64;
}

/// Counts regular files using the OS directory listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorySampler;

impl DirectorySampler {
    pub fn new() -> Self {
        Self
    }

    /// Count regular files directly inside `folder`.
    ///
    /// Entries are classified with `fs::metadata`, so symlinks count as
    /// whatever they point at. Subdirectories are never entered.
    pub fn try_count(&self, folder: &Path) -> Result<u64, SampleError> {
        if !folder.exists() {
            return Err(SampleError::FolderNotFound(folder.to_path_buf()));
        }

        let entries = fs::read_dir(folder).map_err(|source| SampleError::ReadDir {
            path: folder.to_path_buf(),
            source,
        })?;

        let mut files = 0u64;
        for entry in entries {
            let entry = entry.map_err(|source| SampleError::ReadDir {
                path: folder.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let metadata = fs::metadata(&path).map_err(|source| SampleError::Stat {
                path: path.clone(),
                source,
            })?;
            if metadata.is_file() {
                files += 1;
            }
        }

        Ok(files)
    }
}

impl Sampler for DirectorySampler {
    fn count(&self, folder: &Path) -> u64 {
        match self.try_count(folder) {
            Ok(files) => files,
            Err(err) => {
                error!("Error counting files: {}", err);
                0
            }
        }
    }
}
