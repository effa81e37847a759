//! Configuration module for tagdrive
//!
//! Manages the client configuration: which server to talk to, the session
//! cookie, refresh ordering and notification timing. Configuration is stored
//! in the user's config directory and can be overridden through `TAGDRIVE_*`
//! environment variables (nested keys use `__`, e.g.
//! `TAGDRIVE_NOTIFICATIONS__CAPACITY=20`).

mod setup;

pub use setup::first_time_setup;

use crate::catalog::RefreshPolicy;
use crate::notify::{DEFAULT_CAPACITY, NotificationSettings};
use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "TAGDRIVE";

/// Notification tray timing
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Entries kept before the oldest is evicted
    pub capacity: usize,
    /// Idle time before the tray hides
    pub decay_ms: u64,
    /// Length of the fade at the end of `decay_ms`
    pub fade_ms: u64,
    /// Entries older than this are dropped; unset keeps them until evicted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_secs: Option<u64>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            decay_ms: 2000,
            fade_ms: 1000,
            retention_secs: Some(300),
        }
    }
}

impl NotificationConfig {
    /// Settings for a `NotificationLog`
    #[must_use]
    pub fn settings(&self) -> NotificationSettings {
        let millis = |ms: u64| TimeDelta::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
        let seconds = |s: u64| TimeDelta::seconds(i64::try_from(s).unwrap_or(i64::MAX / 1000));
        NotificationSettings {
            capacity: self.capacity.max(1),
            decay: millis(self.decay_ms),
            fade: millis(self.fade_ms.min(self.decay_ms)),
            retention: self.retention_secs.map(seconds),
        }
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the drive server
    pub server_url: String,

    /// Session cookie sent with every request, e.g. `session=...`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,

    pub request_timeout_secs: u64,

    /// Which overlapping refresh response wins
    pub refresh_policy: RefreshPolicy,

    /// Suppress informational output by default
    pub quiet: bool,

    pub notifications: NotificationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:80".to_string(),
            cookie: None,
            request_timeout_secs: 30,
            refresh_policy: RefreshPolicy::default(),
            quiet: false,
            notifications: NotificationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("tagdrive").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load configuration, running first-time setup if no config file exists
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            first_time_setup(&config_path)
        }
    }

    /// Load `path` (which may be missing) layered under environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, Self::environment(None))
    }

    /// `TAGDRIVE_*` variables, read from `source` instead of the process
    /// environment when given
    fn environment(source: Option<config::Map<String, String>>) -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(source)
    }

    fn load_layered(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the path cannot be determined or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env() -> Environment {
        ClientConfig::environment(Some(config::Map::new()))
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "http://localhost:80");
        assert!(config.cookie.is_none());
        assert_eq!(config.refresh_policy, RefreshPolicy::LastInitiated);
        assert_eq!(config.notifications.capacity, 10);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig {
            server_url: "https://drive.example.com".to_string(),
            cookie: Some("session=abc".to_string()),
            refresh_policy: RefreshPolicy::LastCompleted,
            ..ClientConfig::default()
        };
        config.save_to(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("refresh_policy = \"last-completed\""));

        let loaded = ClientConfig::load_layered(&path, no_env()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = ClientConfig::load_layered(&dir.path().join("absent.toml"), no_env()).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "quiet = true\n\n[notifications]\ndecay_ms = 5000\n").unwrap();

        let loaded = ClientConfig::load_layered(&path, no_env()).unwrap();
        assert!(loaded.quiet);
        assert_eq!(loaded.notifications.decay_ms, 5000);
        assert_eq!(loaded.notifications.fade_ms, 1000);
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = \"http://file\"\n").unwrap();

        let mut vars = config::Map::new();
        vars.insert("TAGDRIVE_SERVER_URL".to_string(), "http://env".to_string());
        vars.insert("TAGDRIVE_NOTIFICATIONS__CAPACITY".to_string(), "3".to_string());
        let loaded =
            ClientConfig::load_layered(&path, ClientConfig::environment(Some(vars))).unwrap();
        assert_eq!(loaded.server_url, "http://env");
        assert_eq!(loaded.notifications.capacity, 3);
    }

    #[test]
    fn test_notification_settings_conversion() {
        let config = NotificationConfig {
            capacity: 0,
            decay_ms: 500,
            fade_ms: 800,
            retention_secs: None,
        };
        let settings = config.settings();
        assert_eq!(settings.capacity, 1);
        assert_eq!(settings.decay, TimeDelta::milliseconds(500));
        assert_eq!(settings.fade, TimeDelta::milliseconds(500));
        assert!(settings.retention.is_none());
    }
}
