//! Observability configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Base log level (trace, debug, info, warn, error)
    pub level: String,

    /// Console format
    pub format: LogFormat,

    /// Per-run log files, if enabled
    pub file: Option<FileLogging>,
}

/// Console log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Text,
    Json,
}

/// Per-run log folder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLogging {
    /// Base directory holding `run_<timestamp>` folders
    pub log_dir: PathBuf,

    /// Remove runs older than this many days
    pub retention_days: u64,

    /// Keep at most this many runs
    pub retention_runs: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObservabilityError {
    #[error("unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    UnknownLevel(String),
}

impl LoggingSettings {
    /// Console-only settings at the given level
    pub fn console(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    pub fn with_file_logging(mut self, file: FileLogging) -> Self {
        self.file = Some(file);
        self
    }

    /// Normalized base level
    pub fn base_level(&self) -> Result<&'static str, ObservabilityError> {
        match self.level.trim().to_lowercase().as_str() {
            "trace" => Ok("trace"),
            "debug" => Ok("debug"),
            "info" => Ok("info"),
            "warn" | "warning" => Ok("warn"),
            "error" => Ok("error"),
            _ => Err(ObservabilityError::UnknownLevel(self.level.clone())),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

impl Default for FileLogging {
    fn default() -> Self {
        FileLogging {
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
