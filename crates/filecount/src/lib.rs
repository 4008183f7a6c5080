//! filecount - Core Library
//!
//! Counts the regular files in one folder, appends every observation to an
//! append-only CSV log, and serves the latest count plus recent history.
//!
//! - [`sampler`]: non-recursive, fail-soft file counting
//! - [`log_store`]: the durable `Timestamp,Folder,File Count` log
//! - [`state`]: [`StateHolder`], the latest-value cache over the log
//! - [`scheduler`]: fixed-interval sampling with explicit stop
//! - [`server`]: JSON API (`/api/current`, `/api/history`, `/api/refresh`)

pub mod config;
pub mod log_store;
pub mod sample;
pub mod sampler;
pub mod scheduler;
pub mod server;
pub mod state;

pub use config::{ConfigError, FileConfig, Mode, MonitorConfig, Overrides};
pub use log_store::{LogStore, LogStoreError};
pub use sample::Sample;
pub use sampler::{DirectorySampler, SampleError, Sampler};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use server::{ServerConfig, HISTORY_LIMIT};
pub use state::{CurrentSnapshot, StateHolder};
