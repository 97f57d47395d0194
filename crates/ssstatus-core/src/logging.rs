//! Diagnostic log file.
//!
//! Every invocation appends to `<home>/log` through a `tracing` subscriber.
//! The level comes from `SSSTATUS_LOG` (EnvFilter syntax) and defaults to
//! `warn`, so a bar polling `show` every second only writes on anomalies.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "SSSTATUS_LOG";
const DEFAULT_FILTER: &str = "warn";
const LOG_CREATED: &str = "log file created\n";

/// Installs the global subscriber writing to `log_path`.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber is
/// already installed.
pub fn init(log_path: &Path) -> Result<()> {
    let (dir, file_name) = split_log_path(log_path)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

/// Truncates the log file to its initial line (used by `setup`).
pub fn reset(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(log_path, LOG_CREATED)
        .with_context(|| format!("Failed to reset log file {}", log_path.display()))
}

fn split_log_path(log_path: &Path) -> Result<(&Path, String)> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid log file path {}", log_path.display()))?;
    Ok((dir, file_name.to_string()))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_reset_truncates_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log");
        fs::write(&path, "old entry\nanother\n").unwrap();

        reset(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "log file created\n");
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/tmp/ssstatus/log")).unwrap();
        assert_eq!(dir, Path::new("/tmp/ssstatus"));
        assert_eq!(name, "log");

        let (dir, name) = split_log_path(Path::new("log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "log");
    }
}
