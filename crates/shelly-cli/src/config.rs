//! Configuration file management.
//!
//! Values resolve in this order: command-line flag, environment variable
//! (`SHELLY_DEVICE`, `SHELLY_DB`, handled by clap), config file, built-in
//! default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::warn;

use shelly_core::DEFAULT_TIMEOUT;

use crate::cli::ConfigKey;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "SHELLY_CONFIG";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default device address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Reading database path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Default meter channel index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelly")
            .join("config.toml")
    }

    /// Load config from `path`. A missing or unreadable file yields the
    /// default config; problems are logged, not fatal.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to parse config {}: {}", path.display(), e),
            },
            Err(e) => warn!("Failed to read config {}: {}", path.display(), e),
        }
        Self::default()
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = self.to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Current value for `key`, if set
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Device => self.device.clone(),
            ConfigKey::DbPath => self.db_path.as_ref().map(|p| p.display().to_string()),
            ConfigKey::Timeout => self.timeout.map(|t| t.to_string()),
            ConfigKey::Index => self.index.map(|i| i.to_string()),
        }
    }

    /// Set `key` from its string form
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            bail!("Value for '{}' must not be empty", key_name(key));
        }
        match key {
            ConfigKey::Device => self.device = Some(value.to_string()),
            ConfigKey::DbPath => self.db_path = Some(PathBuf::from(value)),
            ConfigKey::Timeout => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("'{}' is not a valid number of seconds", value))?;
                if secs == 0 {
                    bail!("Timeout must be at least 1 second");
                }
                self.timeout = Some(secs);
            }
            ConfigKey::Index => {
                let index = value
                    .parse()
                    .with_context(|| format!("'{}' is not a valid meter index", value))?;
                self.index = Some(index);
            }
        }
        Ok(())
    }

    /// Remove `key`
    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Device => self.device = None,
            ConfigKey::DbPath => self.db_path = None,
            ConfigKey::Timeout => self.timeout = None,
            ConfigKey::Index => self.index = None,
        }
    }
}

/// The key as it appears in the config file
pub fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::Device => "device",
        ConfigKey::DbPath => "db_path",
        ConfigKey::Timeout => "timeout",
        ConfigKey::Index => "index",
    }
}

/// Resolve device from arg (or env var) or config.
pub fn resolve_device(device: Option<String>, config: &Config) -> Option<String> {
    device
        .filter(|d| !d.trim().is_empty())
        .or_else(|| config.device.clone())
}

/// Resolve the reading database path from arg (or env var), config, or the
/// platform default.
pub fn resolve_db_path(db: Option<PathBuf>, config: &Config) -> PathBuf {
    db.or_else(|| config.db_path.clone())
        .unwrap_or_else(shelly_store::default_db_path)
}

/// Resolve timeout: use provided value, fall back to config, then default
pub fn resolve_timeout(cmd_timeout: Option<u64>, config: &Config) -> Duration {
    cmd_timeout
        .or(config.timeout)
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

/// Resolve meter channel index: arg, config, then channel 0
pub fn resolve_index(cmd_index: Option<usize>, config: &Config) -> usize {
    cmd_index.or(config.index).unwrap_or(0)
}
