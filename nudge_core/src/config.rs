//! Configuration file support for nudge.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nudge/config.toml`.

use crate::{Error, Permission, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub reminders: ReminderConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Smart reminder polling configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Minimum wall-clock gap between two evaluation passes
    #[serde(default = "default_throttle_minutes")]
    pub throttle_minutes: u64,

    /// Period of the background evaluation timer
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            throttle_minutes: default_throttle_minutes(),
            interval_minutes: default_interval_minutes(),
        }
    }
}

impl ReminderConfig {
    pub fn throttle(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.throttle_minutes as i64)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

/// Notification delivery configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_auto_dismiss_secs")]
    pub auto_dismiss_secs: u64,

    /// Tag used when a caller does not supply one
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Progress percentages that earn a milestone toast
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u32>,

    #[serde(default = "default_completion_toast_secs")]
    pub completion_toast_secs: u64,

    #[serde(default = "default_milestone_toast_secs")]
    pub milestone_toast_secs: u64,

    /// Permission the console host reports (CLI only)
    #[serde(default)]
    pub permission: Permission,

    /// Whether the console host claims native notification support (CLI only)
    #[serde(default = "default_native")]
    pub native: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_secs: default_auto_dismiss_secs(),
            default_tag: default_tag(),
            milestones: default_milestones(),
            completion_toast_secs: default_completion_toast_secs(),
            milestone_toast_secs: default_milestone_toast_secs(),
            permission: Permission::default(),
            native: default_native(),
        }
    }
}

impl NotificationConfig {
    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_secs(self.auto_dismiss_secs)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("nudge")
}

fn default_throttle_minutes() -> u64 {
    30
}

fn default_interval_minutes() -> u64 {
    30
}

fn default_auto_dismiss_secs() -> u64 {
    10
}

fn default_tag() -> String {
    "app".into()
}

fn default_milestones() -> Vec<u32> {
    vec![50, 75]
}

fn default_completion_toast_secs() -> u64 {
    5
}

fn default_milestone_toast_secs() -> u64 {
    4
}

fn default_native() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("nudge").join("config.toml")
    }

    /// Reject values the reminder loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.reminders.interval_minutes == 0 {
            return Err(Error::Config(
                "reminders.interval_minutes must be greater than zero".into(),
            ));
        }
        if let Some(bad) = self
            .notifications
            .milestones
            .iter()
            .find(|m| **m == 0 || **m >= 100)
        {
            return Err(Error::Config(format!(
                "notifications.milestones must lie strictly between 0 and 100, got {}",
                bad
            )));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
