//! Configuration management for propdash
//!
//! This module handles loading, validation, and management of
//! propdash configuration from YAML files.

pub mod error;

use propdash_utils::MoneyFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigResult};

// ==================== Configuration Types ====================

/// Fixture data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding fixture files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// File name or glob pattern, relative to `path`
    #[serde(default = "default_fixtures")]
    pub fixtures: String,
    /// Fall back to the built-in demo dataset when no fixture file matches
    #[serde(default = "default_true")]
    pub use_demo_data: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            fixtures: default_fixtures(),
            use_demo_data: true,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_fixtures() -> String {
    "*.json".to_string()
}

fn default_true() -> bool {
    true
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Title printed at the top of PDF reports
    #[serde(default = "default_report_title")]
    pub report_title: String,
    /// Organisation name shown under the title
    #[serde(default)]
    pub company_name: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            report_title: default_report_title(),
            company_name: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_report_title() -> String {
    "Property Financial Report".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for lists
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    50
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places shown for percentages and ratios
    #[serde(default = "default_percentage_decimals")]
    pub percentage_decimals: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            percentage_decimals: default_percentage_decimals(),
        }
    }
}

fn default_percentage_decimals() -> u32 {
    1
}

/// Time range configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeRangeConfig {
    /// Default time range applied when no date flags are given
    #[serde(default)]
    pub default_range: TimeRange,
}

/// Time range enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Current month
    Month,
    /// Current calendar quarter
    Quarter,
    /// Current year
    Year,
    /// All time
    #[default]
    All,
    /// Custom range
    Custom,
}

impl std::str::FromStr for TimeRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            "custom" => Ok(TimeRange::Custom),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Month => write!(f, "month"),
            TimeRange::Quarter => write!(f, "quarter"),
            TimeRange::Year => write!(f, "year"),
            TimeRange::All => write!(f, "all"),
            TimeRange::Custom => write!(f, "custom"),
        }
    }
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency code printed next to amounts
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

impl CurrencyConfig {
    /// Formatter settings for `propdash_utils::format_currency`
    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat {
            code: self.default_currency.clone(),
            decimals: self.decimal_places,
            thousands_separator: self.thousands_separator.clone(),
            decimal_separator: self.decimal_separator.clone(),
            symbol_before: self.symbol_position == SymbolPosition::Before,
        }
    }
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Fixture data settings
    #[serde(default)]
    pub data: DataConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Time range settings
    #[serde(default)]
    pub time_range: TimeRangeConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.currency.default_currency.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "currency.default_currency".to_string(),
                reason: "Currency code must not be empty".to_string(),
            });
        }

        if self.display.percentage_decimals > 6 {
            return Err(ConfigError::InvalidValue {
                field: "display.percentage_decimals".to_string(),
                reason: "Percentage decimals must be between 0 and 6".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be greater than 0".to_string(),
            });
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: "Log level must be one of trace, debug, info, warn, error, off"
                        .to_string(),
                })
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Fixture pattern joined onto the data directory
    pub fn fixture_pattern(&self) -> PathBuf {
        self.data.path.join(&self.data.fixtures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorCode;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.currency.default_currency, "AED");
        assert_eq!(config.pagination.records_per_page, 50);
        assert_eq!(config.time_range.default_range, TimeRange::All);
        assert!(config.data.use_demo_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.currency.default_currency, "AED");
        assert_eq!(config.export.output_dir, PathBuf::from("./exports"));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("currency:\n  default_currency: USD\n").unwrap();
        assert_eq!(config.currency.default_currency, "USD");
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("currency: [unclosed").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = Config::from_yaml("pagination:\n  records_per_page: 0\n").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
        assert_eq!(err.field(), Some("pagination.records_per_page"));

        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::FileNotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("init-config")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "time_range:\n  default_range: quarter\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.time_range.default_range, TimeRange::Quarter);
    }

    #[test]
    fn test_money_format_from_currency() {
        let currency = CurrencyConfig {
            symbol_position: SymbolPosition::After,
            ..CurrencyConfig::default()
        };
        let fmt = currency.money_format();
        assert_eq!(fmt.code, "AED");
        assert!(!fmt.symbol_before);
    }

    #[test]
    fn test_time_range_from_str() {
        assert_eq!("Quarter".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
        assert!("weekly".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Year.to_string(), "year");
    }
}
