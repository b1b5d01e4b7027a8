//! Configuration loading and typed config structures for the kettle
//! simulation.
//!
//! The canonical configuration lives in `kettle-config.yaml` in the
//! working directory. This module defines strongly-typed structs that
//! mirror the YAML structure, and provides a loader that reads and
//! validates the file. Every section is optional; missing values fall
//! back to the defaults below.

use std::path::Path;
use std::time::Duration;

use kettle_types::KettleSpecs;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible kettle.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level kettle configuration.
///
/// Mirrors the structure of `kettle-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KettleConfig {
    /// Static descriptive attributes of the kettle model.
    #[serde(default)]
    pub kettle: KettleSpecs,

    /// Heating physics and water limits.
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// Message log storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Web surface bind address.
    #[serde(default)]
    pub server: ServerSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KettleConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `DATABASE_URL` environment variable overrides
    /// `storage.database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the physics or storage section is
    /// inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if the physics or storage section is
    /// inconsistent.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.storage.apply_env_overrides();
        config.physics.validate()?;
        config.storage.validate()?;
        Ok(config)
    }
}

/// Heating physics and water limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhysicsConfig {
    /// Smallest accepted water amount in litres (inclusive).
    #[serde(default = "default_min_water_amount")]
    pub min_water_amount: f64,

    /// Largest accepted water amount in litres (inclusive).
    #[serde(default = "default_max_water_amount")]
    pub max_water_amount: f64,

    /// Ambient temperature a fresh kettle starts at, in degrees Celsius.
    #[serde(default = "default_room_temperature")]
    pub room_temperature: f64,

    /// Temperature at which heating completes, in degrees Celsius.
    #[serde(default = "default_boiling_temperature")]
    pub boiling_temperature: f64,

    /// Number of heating steps needed to boil from room temperature.
    #[serde(default = "default_boiling_time")]
    pub boiling_time: u32,

    /// Real-time milliseconds per simulated second.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl PhysicsConfig {
    /// Duration of one simulated second.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject physics that would make the simulation meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.min_water_amount,
            self.max_water_amount,
            self.room_temperature,
            self.boiling_temperature,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid {
                reason: "physics values must be finite numbers".to_owned(),
            });
        }
        if self.min_water_amount < 0.0 || self.min_water_amount > self.max_water_amount {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "water range [{}, {}] is empty or negative",
                    self.min_water_amount, self.max_water_amount
                ),
            });
        }
        if self.boiling_time == 0 {
            return Err(ConfigError::Invalid {
                reason: "boiling_time must be at least 1".to_owned(),
            });
        }
        if self.boiling_temperature <= self.room_temperature {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "boiling_temperature {} must be above room_temperature {}",
                    self.boiling_temperature, self.room_temperature
                ),
            });
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            min_water_amount: default_min_water_amount(),
            max_water_amount: default_max_water_amount(),
            room_temperature: default_room_temperature(),
            boiling_temperature: default_boiling_temperature(),
            boiling_time: default_boiling_time(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Message log storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` connection URL of the message log.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a free connection before a write is dropped.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl StorageConfig {
    /// Apply environment variable overrides.
    ///
    /// `DATABASE_URL` overrides `database_url` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
    }

    /// Reject a pool that could never hand out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `max_connections` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                reason: "storage.max_connections must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Connection acquire timeout as a [`Duration`].
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

/// Web surface bind address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory receiving one log file per day.
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_min_water_amount() -> f64 {
    0.0
}

const fn default_max_water_amount() -> f64 {
    1.0
}

const fn default_room_temperature() -> f64 {
    20.0
}

const fn default_boiling_temperature() -> f64 {
    100.0
}

const fn default_boiling_time() -> u32 {
    10
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_database_url() -> String {
    "sqlite://kettle.db".to_owned()
}

const fn default_max_connections() -> u32 {
    4
}

const fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_directory() -> String {
    "logs".to_owned()
}
