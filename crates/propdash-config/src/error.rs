//! Error types for propdash-config

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    FileNotFound,
    InvalidYaml,
    InvalidValue,
    IoError,
}

impl ConfigErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ConfigErrorCode::InvalidYaml => "INVALID_YAML",
            ConfigErrorCode::InvalidValue => "INVALID_VALUE",
            ConfigErrorCode::IoError => "IO_ERROR",
        }
    }
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the configuration could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file {path} does not exist")]
    FileNotFound { path: String },

    #[error("Config is not valid YAML: {message}")]
    InvalidYaml { message: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Could not read config file {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
            ConfigError::IoError { .. } => ConfigErrorCode::IoError,
        }
    }

    /// Dotted path of the offending setting, e.g. `pagination.records_per_page`
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Hints printed under the error by the CLI
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::FileNotFound { path } => vec![
                format!("Pass --config with the right path, or create {}", path),
                "`propdash init-config` writes a commented default file".to_string(),
            ],
            ConfigError::InvalidYaml { .. } => {
                vec!["Compare against the output of `propdash init-config`".to_string()]
            }
            ConfigError::InvalidValue { field, .. } => vec![format!("Fix or remove `{}`; omitted settings use their defaults", field)],
            ConfigError::IoError { .. } => vec![],
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_serializes_like_display() {
        let code = ConfigError::InvalidYaml { message: "bad".to_string() }.code();
        assert_eq!(code.to_string(), "INVALID_YAML");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"INVALID_YAML\"");
    }

    #[test]
    fn test_invalid_value_names_field() {
        let err = ConfigError::InvalidValue {
            field: "currency.decimal_places".to_string(),
            reason: "must be at most 4".to_string(),
        };
        assert_eq!(err.to_string(), "currency.decimal_places: must be at most 4");
        assert_eq!(err.field(), Some("currency.decimal_places"));
        assert!(err.suggestions()[0].contains("currency.decimal_places"));
    }
}
