use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILE: &str = "config.json";
pub(crate) const DB_FILE: &str = "spendwise.db";
pub(crate) const LOG_FILE: &str = "spendwise.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) currency_symbol: String,
    pub(crate) theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) predict_endpoint: Option<String>,
    pub(crate) predict_timeout_secs: u64,
    pub(crate) log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".into(),
            theme: Theme::Dark,
            predict_endpoint: None,
            predict_timeout_secs: 5,
            log_filter: "spendwise=info".into(),
        }
    }
}

impl Config {
    /// Read the config file, falling back to defaults when it does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Malformed config: {}", path.display()))?;
        config.predict_endpoint = config
            .predict_endpoint
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Ok(config)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Where SpendWise keeps its files on this platform.
#[derive(Debug, Clone)]
pub(crate) struct AppPaths {
    pub(crate) config_file: PathBuf,
    pub(crate) data_dir: PathBuf,
}

impl AppPaths {
    pub(crate) fn resolve() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "spendwise", "SpendWise")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::ensure(proj_dirs.config_dir(), proj_dirs.data_dir())
    }

    fn ensure(config_dir: &Path, data_dir: &Path) -> Result<Self> {
        for dir in [config_dir, data_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(Self {
            config_file: config_dir.join(CONFIG_FILE),
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub(crate) fn db_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub(crate) fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
