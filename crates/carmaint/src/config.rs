//! Configuration management for carmaint.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "carmaint";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "maintenance.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CARMAINT_`)
/// 2. TOML config file at `~/.config/carmaint/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// How dates, distances and money are shown.
    pub display: DisplayConfig,
    /// Live query configuration.
    pub observe: ObserveConfig,
    /// Reminder configuration.
    pub reminders: RemindersConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/carmaint/maintenance.db`
    pub database_path: Option<PathBuf>,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format used to show dates. Also accepted as input.
    pub date_format: String,
    /// Unit appended to mileage values.
    pub distance_unit: String,
    /// Currency prefix for service costs.
    pub currency: String,
}

/// Live query configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserveConfig {
    /// How often live queries check for writes made by other processes.
    pub poll_interval_ms: u64,
}

/// Reminder configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemindersConfig {
    /// Accept reminder dates earlier than today.
    pub allow_past_dates: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%d %b %Y".to_string(),
            distance_unit: "km".to_string(),
            currency: "KES".to_string(),
        }
    }
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CARMAINT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.observe.poll_interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "poll_interval_ms must be greater than 0".to_string(),
            });
        }

        if !is_valid_date_format(&self.display.date_format) {
            return Err(Error::ConfigValidation {
                message: format!("invalid date_format: {}", self.display.date_format),
            });
        }

        if self.display.distance_unit.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "distance_unit must not be empty".to_string(),
            });
        }

        if self.display.currency.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "currency must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the live query poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.observe.poll_interval_ms)
    }
}

/// A date format is usable if it parses and renders at least one field.
fn is_valid_date_format(format: &str) -> bool {
    let mut has_field = false;
    for item in StrftimeItems::new(format) {
        match item {
            Item::Error => return false,
            Item::Numeric(..) | Item::Fixed(_) => has_field = true,
            _ => {}
        }
    }
    if !has_field {
        return false;
    }
    // Rendering can still fail for specifiers that need a time or zone.
    let mut rendered = String::new();
    let sample = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    write!(rendered, "{}", sample.format(format)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.display.date_format, "%d %b %Y");
        assert_eq!(config.display.distance_unit, "km");
        assert_eq!(config.observe.poll_interval_ms, 500);
        assert!(!config.reminders.allow_past_dates);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let mut config = Config::default();
        config.observe.poll_interval_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("poll_interval_ms"));
    }

    #[test]
    fn test_validate_invalid_date_format() {
        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("date_format"));
    }

    #[test]
    fn test_validate_date_format_without_fields() {
        let mut config = Config::default();
        config.display.date_format = "today".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_date_format_with_time_specifier() {
        let mut config = Config::default();
        config.display.date_format = "%Y-%m-%d %H:%M".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_currency() {
        let mut config = Config::default();
        config.display.currency = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("currency"));
    }

    #[test]
    fn test_validate_empty_distance_unit() {
        let mut config = Config::default();
        config.display.distance_unit = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("distance_unit"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("maintenance.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_poll_interval() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("carmaint"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    fn load_in(jail: &figment::Jail) -> figment::error::Result<Config> {
        Config::load_from(Some(jail.directory().join("config.toml")))
            .map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn test_load_every_section_from_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [storage]
                database_path = "/data/cars.db"

                [display]
                date_format = "%d/%m/%Y"
                distance_unit = "mi"
                currency = "USD"

                [observe]
                poll_interval_ms = 250

                [reminders]
                allow_past_dates = true
                "#,
            )?;

            let config = load_in(jail)?;
            assert_eq!(config.database_path(), PathBuf::from("/data/cars.db"));
            assert_eq!(config.display.date_format, "%d/%m/%Y");
            assert_eq!(config.display.distance_unit, "mi");
            assert_eq!(config.display.currency, "USD");
            assert_eq!(config.poll_interval(), Duration::from_millis(250));
            assert!(config.reminders.allow_past_dates);
            Ok(())
        });
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[display]\ncurrency = \"EUR\"\n")?;

            let config = load_in(jail)?;
            assert_eq!(config.display.currency, "EUR");
            assert_eq!(config.display.distance_unit, "km");
            assert_eq!(config.observe.poll_interval_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[display]\ncurrency = \"EUR\"\n")?;
            jail.set_env("CARMAINT_DISPLAY__CURRENCY", "USD");
            jail.set_env("CARMAINT_OBSERVE__POLL_INTERVAL_MS", "100");
            jail.set_env("CARMAINT_REMINDERS__ALLOW_PAST_DATES", "true");

            let config = load_in(jail)?;
            assert_eq!(config.display.currency, "USD");
            assert_eq!(config.observe.poll_interval_ms, 100);
            assert!(config.reminders.allow_past_dates);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_value_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[observe]\npoll_interval_ms = 0\n")?;
            assert!(load_in(jail).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_display_config_deserialize() {
        let json = r#"{"currency": "USD"}"#;
        let display: DisplayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(display.currency, "USD");
        assert_eq!(display.date_format, "%d %b %Y");
    }
}
