// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for corticonv
//!
//! Console output always; with the `file-logging` feature, a timestamped
//! run folder of JSON log files and a retention policy over old runs.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingSettings};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps file writers alive; logs are flushed when it is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    run_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder of this process, when file logging is enabled
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }
}

/// Build the console filter: `RUST_LOG` wins, otherwise debug flags over the base level
fn console_filter(settings: &LoggingSettings, debug_flags: &CrateDebugFlags) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let base = settings.base_level()?;
    let directives = debug_flags.to_filter_string(base);
    EnvFilter::try_new(&directives).with_context(|| format!("Invalid log filter '{}'", directives))
}

/// Initialize logging
///
/// With file logging enabled, creates:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── corticonv-anatomy.log
///       ├── corticonv-architecture.log
///       └── corticonv.log (combined)
/// ```
///
/// # Errors
///
/// Fails if the log level is unknown, the run folder cannot be created, or a
/// global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings, debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    let env_filter = console_filter(settings, debug_flags)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer: BoxedLayer = match settings.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_filter(env_filter)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guards, run_dir) = match &settings.file {
        Some(file) => {
            let (file_layers, guards, run_dir) = file_layers(settings, debug_flags, file)?;
            layers.extend(file_layers);
            (guards, Some(run_dir))
        }
        None => (Vec::new(), None),
    };
    #[cfg(not(feature = "file-logging"))]
    let run_dir = None;

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        run_dir,
    })
}

/// Initialize console logging at the configured level only
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(&LoggingSettings::default(), debug_flags)
}

#[cfg(feature = "file-logging")]
fn file_layers(
    settings: &LoggingSettings,
    debug_flags: &CrateDebugFlags,
    file: &crate::config::FileLogging,
) -> Result<(
    Vec<BoxedLayer>,
    Vec<tracing_appender::non_blocking::WorkerGuard>,
    PathBuf,
)> {
    use tracing_appender::rolling;

    let timestamp = chrono::Utc::now().format(RUN_TIMESTAMP_FORMAT);
    let run_folder = file.log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(
        &file.log_dir,
        file.retention_days,
        file.retention_runs,
        chrono::Utc::now(),
    )?;

    let base = settings.base_level()?;
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    // One file per crate
    for crate_name in crate::KNOWN_CRATES {
        let file_name = format!("{}.log", crate_name);
        if file_name == COMBINED_LOG_FILE {
            continue;
        }
        let appender = rolling::never(&run_folder, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        let directive = format!("{}=debug", crate::crate_target(crate_name));
        let filter = EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid log filter '{}'", directive))?;
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(filter)
                .boxed(),
        );
    }

    // Combined log file
    let appender = rolling::never(&run_folder, COMBINED_LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);
    let directives = debug_flags.to_filter_string(base);
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter '{}'", directives))?;
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(filter)
            .boxed(),
    );

    Ok((layers, guards, run_folder))
}

#[cfg(feature = "file-logging")]
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[cfg(feature = "file-logging")]
const COMBINED_LOG_FILE: &str = "corticonv.log";

/// Remove run folders older than `retention_days`, then keep at most `retention_runs`
#[cfg(feature = "file-logging")]
fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<()> {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    if !base_log_dir.exists() {
        return Ok(());
    }

    let cutoff = now - chrono::Duration::days(retention_days.min(i64::MAX as u64) as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to read log directory: {}", base_log_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(stamp) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
        else {
            continue;
        };
        if let Ok(naive) = NaiveDateTime::parse_from_str(stamp, RUN_TIMESTAMP_FORMAT) {
            runs.push((path, Utc.from_utc_datetime(&naive)));
        }
    }

    // Newest first
    runs.sort_by(|a, b| b.1.cmp(&a.1));

    for (index, (path, started)) in runs.iter().enumerate() {
        if *started < cutoff || index >= retention_runs {
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    Ok(())
}

#[cfg(all(test, feature = "file-logging"))]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_cleanup_keeps_recent_runs() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in [
            "20250101_000000",
            "20250601_000000",
            "20250602_000000",
            "20250603_000000",
        ] {
            std::fs::create_dir(dir.path().join(format!("run_{}", stamp))).unwrap();
        }
        std::fs::create_dir(dir.path().join("notes")).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        cleanup_old_logs(dir.path(), 30, 2, now).unwrap();

        let mut left: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["notes", "run_20250602_000000", "run_20250603_000000"]);
    }

    #[test]
    fn test_combined_log_written_once_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let file = crate::config::FileLogging {
            log_dir: dir.path().to_path_buf(),
            retention_days: 30,
            retention_runs: 10,
        };
        let settings = LoggingSettings::console("info").with_file_logging(file.clone());

        let (layers, guards, run_dir) =
            file_layers(&settings, &CrateDebugFlags::default(), &file).unwrap();
        let subscriber = Registry::default().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "corticonv_anatomy", "anatomy loaded");
            tracing::debug!(target: "corticonv_architecture", "stride detail");
        });
        drop(guards);

        let combined = std::fs::read_to_string(run_dir.join(COMBINED_LOG_FILE)).unwrap();
        assert_eq!(combined.matches("anatomy loaded").count(), 1);
        assert_eq!(combined.matches("stride detail").count(), 0);

        let per_crate =
            std::fs::read_to_string(run_dir.join("corticonv-architecture.log")).unwrap();
        assert_eq!(per_crate.matches("stride detail").count(), 1);
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        assert!(cleanup_old_logs(&dir.path().join("absent"), 30, 10, now).is_ok());
    }
}
