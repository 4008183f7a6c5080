//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use filecount::ConfigError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// No folder given on the command line, environment, or config file
    pub fn missing_folder() -> Self {
        Self::new("No folder to monitor")
            .with_context("The folder is required for once, watch and serve")
            .with_suggestions([
                "TRY: Pass it explicitly: filecount once --folder ~/Downloads",
                "TRY: Set FILECOUNT_FOLDER in the environment",
                "TRY: Add `folder = \"...\"` under [monitor] in a --config file",
            ])
    }

    /// Interval string could not be parsed
    pub fn invalid_interval(raw: &str) -> Self {
        Self::new(format!("Invalid interval: '{}'", raw))
            .with_context("Interval must be a positive number with an optional unit")
            .with_suggestions([
                "TRY: Use formats like: 90, 30s, 15m, 1h, 1.5h",
                "TRY: Valid units: s, m, h (case insensitive)",
            ])
    }

    /// Config file missing or unreadable
    pub fn config_unreadable(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot read config file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Check that the file exists: ls -la {}", path.display()),
                "TRY: Drop --config to run with defaults".to_string(),
            ])
    }

    /// Config file is not valid TOML for this tool
    pub fn config_invalid(path: &Path, reason: &str) -> Self {
        Self::new(format!("Invalid config file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Known sections are [monitor] (folder, log_file, interval) and [server] (host, port, interval)",
                "TRY: Run `filecount config` to see the resolved settings",
            ])
    }

    /// History requested before any sample was logged
    pub fn log_not_found(path: &Path) -> Self {
        Self::new(format!("Log file not found: {}", path.display()))
            .with_context("No samples have been recorded at this path yet")
            .with_suggestions([
                "TRY: Record a first sample: filecount once --folder <FOLDER>".to_string(),
                "TRY: Point at an existing log: filecount history --log-file <FILE>".to_string(),
            ])
    }
}

impl From<ConfigError> for HelpfulError {
    fn from(err: ConfigError) -> Self {
        match &err {
            ConfigError::MissingFolder => Self::missing_folder(),
            ConfigError::InvalidInterval(raw) => Self::invalid_interval(raw),
            ConfigError::Read { path, source } => Self::config_unreadable(path, &source.to_string()),
            ConfigError::Parse { path, source } => Self::config_invalid(path, &source.to_string()),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While sampling")
            .with_suggestions(["Try again"]);

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While sampling"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_from_config_error() {
        let err: HelpfulError = ConfigError::InvalidInterval("soon".to_string()).into();
        let display = format!("{}", err);
        assert!(display.contains("'soon'"));
        assert!(display.contains("TRY:"));

        let err: HelpfulError = ConfigError::MissingFolder.into();
        assert!(format!("{}", err).contains("FILECOUNT_FOLDER"));
    }

    #[test]
    fn test_log_not_found() {
        let path = PathBuf::from("/nonexistent/counts.csv");
        let display = format!("{}", HelpfulError::log_not_found(&path));
        assert!(display.contains("/nonexistent/counts.csv"));
        assert!(display.contains("filecount once"));
    }
}
