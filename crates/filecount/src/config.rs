//! Configuration layering for the monitor.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! environment variables, then command-line flags. The environment and flag
//! layers are merged by clap before they reach [`Overrides`].

use crate::log_store::DEFAULT_LOG_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Interval for unattended `watch` runs.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Interval for `serve`, short enough that the dashboard visibly moves.
pub const DEFAULT_SERVE_INTERVAL: Duration = Duration::from_secs(30);

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid interval '{0}'")]
    InvalidInterval(String),

    #[error("No folder to monitor was configured")]
    MissingFolder,
}

/// On-disk configuration, all fields optional.
///
/// ```toml
/// [monitor]
/// folder = "/home/me/Downloads"
/// log_file = "file_count_log.csv"
/// interval = "1h"
///
/// [server]
/// host = "127.0.0.1"
/// port = 3000
/// interval = "30s"
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub monitor: MonitorSection,
    pub server: ServerSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorSection {
    pub folder: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub interval: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub interval: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Values supplied by flags or environment variables.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub folder: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub interval: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Which mode the configuration is resolved for; only the default interval
/// and the `[server]` section depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Watch,
    Serve,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub folder: PathBuf,
    pub log_file: PathBuf,
    pub interval: Duration,
    pub host: String,
    pub port: u16,
}

impl MonitorConfig {
    pub fn resolve(file: &FileConfig, overrides: &Overrides, mode: Mode) -> Result<Self, ConfigError> {
        Ok(Self {
            folder: resolve_folder(file, overrides)?,
            log_file: resolve_log_file(file, overrides),
            interval: resolve_interval(file, overrides, mode)?,
            host: resolve_host(file, overrides),
            port: resolve_port(file, overrides),
        })
    }
}

/// Monitored folder; the one setting without a default.
pub fn resolve_folder(file: &FileConfig, overrides: &Overrides) -> Result<PathBuf, ConfigError> {
    overrides
        .folder
        .clone()
        .or_else(|| file.monitor.folder.clone())
        .ok_or(ConfigError::MissingFolder)
}

pub fn resolve_host(file: &FileConfig, overrides: &Overrides) -> String {
    overrides
        .host
        .clone()
        .or_else(|| file.server.host.clone())
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

pub fn resolve_port(file: &FileConfig, overrides: &Overrides) -> u16 {
    overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT)
}

/// Log file path; needs no folder, so read-only commands can use it alone.
pub fn resolve_log_file(file: &FileConfig, overrides: &Overrides) -> PathBuf {
    overrides
        .log_file
        .clone()
        .or_else(|| file.monitor.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Sampling interval for `mode`. `[server].interval` applies to serve only
/// and falls back to `[monitor].interval`.
pub fn resolve_interval(file: &FileConfig, overrides: &Overrides, mode: Mode) -> Result<Duration, ConfigError> {
    let file_interval = match mode {
        Mode::Serve => file.server.interval.as_ref().or(file.monitor.interval.as_ref()),
        Mode::Watch => file.monitor.interval.as_ref(),
    };
    match overrides.interval.as_ref().or(file_interval) {
        Some(raw) => parse_interval(raw),
        None => Ok(match mode {
            Mode::Watch => DEFAULT_WATCH_INTERVAL,
            Mode::Serve => DEFAULT_SERVE_INTERVAL,
        }),
    }
}

/// Parse a human-readable interval into a duration
///
/// Examples:
/// - "90" -> 90 seconds
/// - "30s" -> 30 seconds
/// - "15m" -> 15 minutes
/// - "1.5h" -> 90 minutes
pub fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let normalized = raw.trim().to_lowercase();
    let (num_part, unit_part) = split_number_unit(&normalized);

    let num: f64 = num_part
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidInterval(raw.to_string()))?;

    let multiplier = match unit_part.trim() {
        "" | "s" | "sec" | "secs" => 1.0,
        "m" | "min" | "mins" => 60.0,
        "h" | "hr" | "hrs" => 3600.0,
        _ => return Err(ConfigError::InvalidInterval(raw.to_string())),
    };

    let secs = num * multiplier;
    if secs <= 0.0 {
        return Err(ConfigError::InvalidInterval(raw.to_string()));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidInterval(raw.to_string()))
}

/// Split an interval string into number and unit parts
fn split_number_unit(s: &str) -> (&str, &str) {
    let idx = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    (&s[..idx], &s[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_interval("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("1.5H").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval(" 2 min ").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_interval_errors() {
        assert!(parse_interval("").is_err());
        assert!(parse_interval("abc").is_err());
        assert!(parse_interval("5d").is_err());
        assert!(parse_interval("0").is_err());
        assert!(parse_interval("-3s").is_err());
        assert!(parse_interval("99999999999999999999999999h").is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let overrides = Overrides {
            folder: Some(PathBuf::from("/data")),
            ..Default::default()
        };

        let watch = MonitorConfig::resolve(&FileConfig::default(), &overrides, Mode::Watch).unwrap();
        assert_eq!(watch.folder, PathBuf::from("/data"));
        assert_eq!(watch.log_file, PathBuf::from("file_count_log.csv"));
        assert_eq!(watch.interval, DEFAULT_WATCH_INTERVAL);
        assert_eq!(watch.host, "127.0.0.1");
        assert_eq!(watch.port, 3000);

        let serve = MonitorConfig::resolve(&FileConfig::default(), &overrides, Mode::Serve).unwrap();
        assert_eq!(serve.interval, DEFAULT_SERVE_INTERVAL);
    }

    #[test]
    fn test_resolve_requires_folder() {
        let err = MonitorConfig::resolve(&FileConfig::default(), &Overrides::default(), Mode::Watch)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFolder));
    }

    #[test]
    fn test_file_values_and_override_precedence() {
        let file = FileConfig::parse(
            r#"
            [monitor]
            folder = "/from/file"
            log_file = "counts.csv"
            interval = "10m"

            [server]
            port = 8080
            interval = "5s"
            "#,
        )
        .unwrap();

        let resolved = MonitorConfig::resolve(&file, &Overrides::default(), Mode::Watch).unwrap();
        assert_eq!(resolved.folder, PathBuf::from("/from/file"));
        assert_eq!(resolved.log_file, PathBuf::from("counts.csv"));
        assert_eq!(resolved.interval, Duration::from_secs(600));
        assert_eq!(resolved.port, 8080);

        let serve = MonitorConfig::resolve(&file, &Overrides::default(), Mode::Serve).unwrap();
        assert_eq!(serve.interval, Duration::from_secs(5));

        let overrides = Overrides {
            folder: Some(PathBuf::from("/from/flag")),
            interval: Some("2h".to_string()),
            port: Some(9000),
            ..Default::default()
        };
        let resolved = MonitorConfig::resolve(&file, &overrides, Mode::Serve).unwrap();
        assert_eq!(resolved.folder, PathBuf::from("/from/flag"));
        assert_eq!(resolved.interval, Duration::from_secs(7200));
        assert_eq!(resolved.port, 9000);
        assert_eq!(resolved.log_file, PathBuf::from("counts.csv"));
    }

    #[test]
    fn test_host_and_port_overrides_beat_file() {
        let file = FileConfig::parse("[server]\nhost = \"10.0.0.1\"\nport = 8080\n").unwrap();
        assert_eq!(resolve_host(&file, &Overrides::default()), "10.0.0.1");
        assert_eq!(resolve_port(&file, &Overrides::default()), 8080);

        let overrides = Overrides {
            host: Some("0.0.0.0".to_string()),
            port: Some(9999),
            ..Default::default()
        };
        assert_eq!(resolve_host(&file, &overrides), "0.0.0.0");
        assert_eq!(resolve_port(&file, &overrides), 9999);
    }

    #[test]
    fn test_folder_resolves_without_touching_interval() {
        let file = FileConfig::parse("[monitor]\nfolder = \"/x\"\ninterval = \"soon\"\n").unwrap();
        assert_eq!(resolve_folder(&file, &Overrides::default()).unwrap(), PathBuf::from("/x"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::parse("[monitor]\nfolders = \"/x\"\n").is_err());
    }

    #[test]
    fn test_bad_interval_in_file_is_reported() {
        let file = FileConfig::parse("[monitor]\nfolder = \"/x\"\ninterval = \"soon\"\n").unwrap();
        let err = MonitorConfig::resolve(&file, &Overrides::default(), Mode::Watch).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval(ref raw) if raw == "soon"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
