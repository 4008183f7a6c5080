//! Latest-known count for one monitored folder, layered over the log.

use crate::log_store::{LogStore, LogStoreError};
use crate::sample::Sample;
use crate::sampler::Sampler;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// What `current()` reports. `last_updated` is `None` until the first sample,
/// which keeps "never sampled" distinct from a real zero count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSnapshot {
    pub count: u64,
    pub folder_path: String,
    pub last_updated: Option<String>,
}

#[derive(Debug, Default)]
struct Cache {
    count: u64,
    last_updated: Option<DateTime<Utc>>,
}

/// Binds a sampler and a log store to one folder.
///
/// `sample_once` is the only mutating operation. It holds the sampling lock
/// for the whole count/append/update sequence, so the log's line order always
/// matches the order of its timestamps even with concurrent callers. The
/// cache lock is only taken for the final update, so `current()` never waits
/// on a directory walk or an fsync.
pub struct StateHolder {
    folder: PathBuf,
    sampler: Box<dyn Sampler>,
    store: LogStore,
    sampling: Mutex<()>,
    cache: Mutex<Cache>,
}

impl StateHolder {
    pub fn new(folder: impl Into<PathBuf>, sampler: Box<dyn Sampler>, store: LogStore) -> Self {
        Self {
            folder: folder.into(),
            sampler,
            store,
            sampling: Mutex::new(()),
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn log_path(&self) -> &Path {
        self.store.path()
    }

    /// Count, append to the log, then update the cache.
    ///
    /// A failed append leaves the cache as it was.
    pub fn sample_once(&self) -> Result<Sample, LogStoreError> {
        let _sampling = self.sampling.lock().map_err(|_| LogStoreError::LockError)?;

        let count = self.sampler.count(&self.folder);
        let taken_at = Utc::now();
        let sample = Sample::new(taken_at, self.folder.display().to_string(), count);

        self.store.append(&sample)?;

        {
            let mut cache = self.cache.lock().map_err(|_| LogStoreError::LockError)?;
            cache.count = count;
            cache.last_updated = Some(taken_at);
        }
        info!("{}: Found {} files", sample.timestamp, count);
        Ok(sample)
    }

    pub fn current(&self) -> CurrentSnapshot {
        // a poisoned lock still holds the last committed values
        let cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        CurrentSnapshot {
            count: cache.count,
            folder_path: self.folder.display().to_string(),
            last_updated: cache
                .last_updated
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    /// Most recent `limit` samples from the durable log. Ignores the cache.
    pub fn history(&self, limit: usize) -> Vec<Sample> {
        self.store.tail(limit)
    }
}
