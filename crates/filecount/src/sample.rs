//! The sample record shared by the sampler, the CSV log and the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in the CSV log: ISO-8601 with a space separator,
/// second precision, no zone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One timestamped file-count observation for a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub timestamp: String,
    /// Monitored folder, exactly as configured
    pub folder: String,
    /// Regular files directly inside `folder`
    pub count: u64,
}

impl Sample {
    pub fn new(taken_at: DateTime<Utc>, folder: impl Into<String>, count: u64) -> Self {
        Self {
            timestamp: format_timestamp(taken_at),
            folder: folder.into(),
            count,
        }
    }

    /// Operator console line, e.g. `2024-01-15 10:30:00: Found 42 files in '/data'`.
    pub fn describe(&self) -> String {
        format!(
            "{}: Found {} files in '{}'",
            self.timestamp, self.count, self.folder
        )
    }
}

/// Truncate an instant to the log's second-precision timestamp.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}
