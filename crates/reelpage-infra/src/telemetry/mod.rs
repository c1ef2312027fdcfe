//! Tracing initialization
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter`, a console
//! layer and, when a log directory is configured, a plain-text layer that
//! appends to `{dir}/{prefix}-{YYYYMMDD}.txt`.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use reelpage_core::Config;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "reelpage=info";

const LOG_FILE_SUFFIX: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryOptions {
    /// Directory of the daily log file; `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    pub log_file_prefix: String,
    pub default_filter: String,
}

impl TelemetryOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            log_file_prefix: config.log_file_prefix.clone(),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }

    pub fn console_only() -> Self {
        Self {
            log_dir: None,
            log_file_prefix: String::new(),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

fn dated_prefix(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, date.format("%Y%m%d"))
}

/// Path of the log file for `date`.
pub fn log_file_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}", dated_prefix(prefix, date), LOG_FILE_SUFFIX))
}

/// Initialize tracing. Returns the log file in use, if any.
///
/// The file is named after the day the process started and is appended to
/// for the lifetime of the process. Fails if the log file cannot be opened
/// or a global subscriber is already installed.
pub fn init_telemetry(options: &TelemetryOptions) -> anyhow::Result<Option<PathBuf>> {
    let (log_path, file_layer) = match &options.log_dir {
        Some(dir) => {
            let today = Local::now().date_naive();
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(dated_prefix(&options.log_file_prefix, today))
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(dir)
                .with_context(|| format!("Failed to open log file in {}", dir.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(appender);
            (
                Some(log_file_path(dir, &options.log_file_prefix, today)),
                Some(layer),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&options.default_filter)),
        )
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match &log_path {
        Some(path) => tracing::debug!(log_file = %path.display(), "Tracing initialized"),
        None => tracing::debug!("Tracing initialized without a log file"),
    }
    Ok(log_path)
}
