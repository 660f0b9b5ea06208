//! Logging configuration using the tracing ecosystem.
//!
//! Log output goes to a daily rotating file so it never corrupts the
//! terminal UI. Levels come from `RUST_LOG`:
//! - `RUST_LOG=catfilter=debug` - selection and dropdown transitions
//! - `RUST_LOG=catfilter=trace` - every key event and dispatch

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "catfilter=info,warn";

/// File name prefix for rotated log files.
const LOG_FILE_PREFIX: &str = "catfilter.log";

/// Initialize the logging system.
///
/// Writes to `log_dir` when given, otherwise to the platform local data
/// directory (`~/.local/share/catfilter/logs/` on Linux). The returned guard
/// flushes buffered lines when dropped; keep it alive until exit.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created, or
/// a global subscriber is already installed.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<WorkerGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_log_directory()?,
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "catfilter starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(guard)
}

/// Platform local data directory with `catfilter/logs` appended.
fn default_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("catfilter").join("logs"))
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("catfilter shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directory_structure() {
        if let Ok(dir) = default_log_directory() {
            assert!(dir.ends_with("catfilter/logs"));
        }
    }
}
