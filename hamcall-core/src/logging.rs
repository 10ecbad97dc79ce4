use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use anyhow::Context;
use tokio::task;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, filter::LevelFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

use crate::config::HamcallConfig;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const SECS_PER_DAY: u64 = 60 * 60 * 24;

/// Keeps the non-blocking file writer flushing; drop it last.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Log destination and verbosity for one process
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    /// File name prefix, e.g. `hamcall` → `hamcall.2026-10-18.log`
    pub prefix: String,
    pub level: String,
    /// Rolled files older than this are deleted
    pub retention: Duration,
}

impl LogSettings {
    pub fn from_config(config: &HamcallConfig, prefix: &str) -> Self {
        Self {
            dir: PathBuf::from(&config.log_dir),
            prefix: prefix.to_string(),
            level: config.log_level.clone(),
            retention: Duration::from_secs(SECS_PER_DAY * config.log_retention_days.max(1)),
        }
    }
}

/// Install the daily-file + console subscriber and start log retention.
///
/// Console output goes to stderr: stdout belongs to lookup results, so
/// `hamcall lookup W1AW > out.txt` captures only the record. `RUST_LOG`
/// overrides the configured level for both layers.
///
/// Must be called from inside a tokio runtime (spawns the cleanup task).
pub fn init_logging(settings: &LogSettings) -> anyhow::Result<LoggerGuard> {
    let filter_level = normalize_level(&settings.level);
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&settings.prefix)
        .filename_suffix("log")
        .build(&settings.dir)
        .with_context(|| format!("Failed to create file appender in {:?}", settings.dir))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(build_filter(filter_level, &rust_log));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(build_filter(filter_level, &rust_log));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if filter_level.is_none() {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", settings.level);
    }

    start_log_cleanup_task(settings.clone());

    Ok(LoggerGuard(guard))
}

fn normalize_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

fn build_filter(level: Option<LevelFilter>, rust_log: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.unwrap_or(LevelFilter::INFO).into())
        .parse_lossy(rust_log)
}

fn start_log_cleanup_task(settings: LogSettings) {
    task::spawn(async move {
        loop {
            match cleanup_old_logs(&settings.dir, &settings.prefix, settings.retention) {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Log cleanup removed {} file(s)", removed),
                Err(e) => tracing::warn!("Failed to delete old log file: {}", e),
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// One of our rolled files, last written more than `max_age` ago.
fn is_expired_log(file_name: &str, prefix: &str, modified: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    file_name.starts_with(prefix)
        && file_name.ends_with(".log")
        && now.duration_since(modified).unwrap_or_default() > max_age
}

fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Ok(modified) = entry.metadata()?.modified() else {
            continue;
        };

        if is_expired_log(&file_name, prefix, modified, now, max_age) {
            fs::remove_file(entry.path())?;
            removed += 1;
            tracing::info!("Old log file deleted: {}", file_name);
        }
    }
    Ok(removed)
}
