use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::system_monitor::Thresholds;
use crate::error::HostwatchError;

pub const ENV_WARNING: &str = "HOSTWATCH_WARNING";
pub const ENV_CRITICAL: &str = "HOSTWATCH_CRITICAL";
pub const ENV_POLL_INTERVAL: &str = "HOSTWATCH_POLL_INTERVAL_SECS";
pub const ENV_ALERT_COOLDOWN: &str = "HOSTWATCH_ALERT_COOLDOWN_SECS";
pub const ENV_COMMAND_TIMEOUT: &str = "HOSTWATCH_COMMAND_TIMEOUT_SECS";

fn default_warning() -> f64 {
    70.0
}

fn default_critical() -> f64 {
    80.0
}

fn default_poll_interval() -> u64 {
    30
}

fn default_cooldown() -> u64 {
    300
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_warning")]
    pub warning_threshold: f64,
    #[serde(default = "default_critical")]
    pub critical_threshold: f64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_cooldown")]
    pub alert_cooldown_secs: u64,
    #[serde(default = "default_timeout")]
    pub command_timeout_secs: u64,
    /// Alert destinations: `console` or webhook URLs
    #[serde(default)]
    pub destinations: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warning_threshold: default_warning(),
            critical_threshold: default_critical(),
            poll_interval_secs: default_poll_interval(),
            alert_cooldown_secs: default_cooldown(),
            command_timeout_secs: default_timeout(),
            destinations: Vec::new(),
        }
    }
}

impl Config {
    /// Load the user config file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::get_config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("hostwatch").join("config.json"))
    }

    /// Apply `HOSTWATCH_*` overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::error::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(key: &str, raw: String) -> crate::error::Result<T> {
            raw.trim()
                .parse()
                .map_err(|_| HostwatchError::config(format!("invalid value for {}: '{}'", key, raw)))
        }

        if let Some(raw) = lookup(ENV_WARNING) {
            self.warning_threshold = parsed(ENV_WARNING, raw)?;
        }
        if let Some(raw) = lookup(ENV_CRITICAL) {
            self.critical_threshold = parsed(ENV_CRITICAL, raw)?;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL) {
            self.poll_interval_secs = parsed(ENV_POLL_INTERVAL, raw)?;
        }
        if let Some(raw) = lookup(ENV_ALERT_COOLDOWN) {
            self.alert_cooldown_secs = parsed(ENV_ALERT_COOLDOWN, raw)?;
        }
        if let Some(raw) = lookup(ENV_COMMAND_TIMEOUT) {
            self.command_timeout_secs = parsed(ENV_COMMAND_TIMEOUT, raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.warning_threshold.is_finite() || !self.critical_threshold.is_finite() {
            return Err(HostwatchError::config("thresholds must be finite numbers"));
        }
        if self.warning_threshold >= self.critical_threshold {
            return Err(HostwatchError::config(format!(
                "warning threshold ({:.1}°C) must be below critical threshold ({:.1}°C)",
                self.warning_threshold, self.critical_threshold
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(HostwatchError::config("poll interval must be at least 1 second"));
        }
        if self.alert_cooldown_secs == 0 {
            return Err(HostwatchError::config("alert cooldown must be at least 1 second"));
        }
        if self.command_timeout_secs == 0 {
            return Err(HostwatchError::config("command timeout must be at least 1 second"));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.warning_threshold, self.critical_threshold)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Returns false when the destination was already present
    pub fn add_destination(&mut self, destination: &str) -> bool {
        if self.destinations.iter().any(|d| d == destination) {
            return false;
        }
        self.destinations.push(destination.to_string());
        true
    }

    /// Returns false when the destination was not present
    pub fn remove_destination(&mut self, destination: &str) -> bool {
        let before = self.destinations.len();
        self.destinations.retain(|d| d != destination);
        self.destinations.len() != before
    }
}
