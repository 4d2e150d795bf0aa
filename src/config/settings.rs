//! Configuration settings for almanac.

use crate::error::{AlmanacError, ConfigError, Result};
use crate::time::zone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        content.parse()
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Candidate config files, in priority order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("almanac.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("almanac/config.toml"));
        }
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.calendar.default_zone()?;
        self.calendar.display_zone()?;

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ))
            .into());
        }
        Ok(())
    }

    /// Install the configured default zone as the process default.
    pub fn apply(&self) -> Result<()> {
        if let Some(tz) = self.calendar.default_zone()? {
            zone::set_default_zone(tz);
        }
        Ok(())
    }
}

/// Calendar and time zone settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// IANA zone that naive date-times are anchored in. Falls back to `TZ`,
    /// then UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_zone: Option<String>,
    /// IANA zone to render zoned values in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_zone: Option<String>,
}

impl CalendarConfig {
    /// The parsed default zone, if configured.
    pub fn default_zone(&self) -> Result<Option<Tz>> {
        Self::parse(&self.default_zone, "calendar.default_zone")
    }

    /// The parsed display zone, if configured.
    pub fn display_zone(&self) -> Result<Option<Tz>> {
        Self::parse(&self.display_zone, "calendar.display_zone")
    }

    fn parse(value: &Option<String>, field: &str) -> Result<Option<Tz>> {
        match value {
            None => Ok(None),
            Some(name) => zone::parse_zone(name).map(Some).map_err(|e| {
                ConfigError::Invalid(format!("{}: {}", field, e)).into()
            }),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` level; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FromStr for Config {
    type Err = AlmanacError;

    /// Parse configuration from a TOML string.
    fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}
