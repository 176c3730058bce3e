use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "SPENDWISE_LOG";

/// Filter from `SPENDWISE_LOG` when set, otherwise the configured directive.
pub(crate) fn build_filter(configured: &str) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid {LOG_ENV} filter: {directive}")),
        _ => EnvFilter::try_new(configured)
            .with_context(|| format!("Invalid log filter: {configured}")),
    }
}

/// Install a global subscriber that appends to `log_path`.
///
/// Logs go to a file so the TUI's alternate screen stays clean.
pub(crate) fn init(log_path: &Path, configured: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(configured)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::info!(path = %log_path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_valid_filter() {
        assert!(EnvFilter::try_new("spendwise=debug,reqwest=warn").is_ok());
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spendwise.log");
        // Another test may already own the global subscriber.
        let _ = init(&path, "spendwise=info");
        assert!(path.exists());
    }

    #[test]
    fn test_missing_log_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("spendwise.log");
        assert!(init(&path, "spendwise=info").is_err());
    }
}
