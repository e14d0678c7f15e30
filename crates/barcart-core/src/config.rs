//! Application configuration management.
//!
//! Holds where user data is stored and which API endpoint to talk to.
//! Configuration is stored at `~/.config/barcart/config.json`; the
//! `BARCART_DATA_DIR` and `BARCART_API_URL` environment variables take
//! precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_RANDOM_COUNT, MAX_RANDOM_COUNT};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "barcart";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Overrides the directory favorites and preferences are stored in
pub const DATA_DIR_ENV: &str = "BARCART_DATA_DIR";

/// Overrides the cocktail API base URL
pub const API_URL_ENV: &str = "BARCART_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_count: Option<usize>,
}

/// Reject random-cocktail counts outside `1..=MAX_RANDOM_COUNT`.
pub fn check_random_count(count: usize) -> Result<usize> {
    if count == 0 || count > MAX_RANDOM_COUNT {
        bail!("Random count must be between 1 and {}", MAX_RANDOM_COUNT);
    }
    Ok(count)
}

impl Config {
    /// Settings from the config file with environment overrides applied.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Settings from the config file alone. Use this before `save` so
    /// environment overrides are not written back.
    pub fn load_file() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Change one setting by its command-line name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data-dir" => self.data_dir = Some(PathBuf::from(value)),
            "api-url" => self.api_base_url = Some(value.trim_end_matches('/').to_string()),
            "random-count" => {
                let count = value
                    .parse()
                    .with_context(|| format!("Invalid count: {}", value))?;
                self.random_count = Some(check_random_count(count)?);
            }
            other => bail!("Unknown setting: {}", other),
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = var(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.api_base_url = Some(url);
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the key-value store files
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn random_count(&self) -> usize {
        self.random_count
            .unwrap_or(DEFAULT_RANDOM_COUNT)
            .clamp(1, MAX_RANDOM_COUNT)
    }
}
