//! Error types for propdash-export

use propdash_core::{ErrorDetails, ErrorSeverity};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Message for an empty PDF or workbook export
pub const NO_TRANSACTION_DATA: &str = "No transaction data available to export";
/// Message for an empty CSV export
pub const NO_DATA: &str = "No data available to export";

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportErrorCode {
    InvalidInput,
    ExportFailure,
    DeliveryFailed,
}

impl std::fmt::Display for ExportErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
            ExportErrorCode::ExportFailure => write!(f, "EXPORT_FAILURE"),
            ExportErrorCode::DeliveryFailed => write!(f, "DELIVERY_FAILED"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export, or unusable input; no artifact was produced
    #[error("{message}")]
    InvalidInput { message: String },

    /// A writer library failed while rendering
    #[error("{message}: {source}")]
    ExportFailure {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The artifact was rendered but could not be handed to the sink
    #[error("Could not deliver {path}: {source}")]
    Delivery {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ExportError::InvalidInput {
            message: message.into(),
        }
    }

    /// Wrap a library error, keeping it as the cause
    pub fn failure(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ExportError::ExportFailure {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn code(&self) -> ExportErrorCode {
        match self {
            ExportError::InvalidInput { .. } => ExportErrorCode::InvalidInput,
            ExportError::ExportFailure { .. } => ExportErrorCode::ExportFailure,
            ExportError::Delivery { .. } => ExportErrorCode::DeliveryFailed,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExportError::InvalidInput { .. } => ErrorSeverity::Warning,
            ExportError::ExportFailure { .. } | ExportError::Delivery { .. } => ErrorSeverity::Error,
        }
    }

    /// User-facing notification text
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());
        match self {
            ExportError::InvalidInput { .. } => {
                details.with_suggestion("Adjust the filters so at least one record matches.".to_string())
            }
            ExportError::Delivery { path, .. } => details
                .with_detail(serde_json::json!({ "path": path }))
                .with_suggestion("Check that the export directory exists and is writable.".to_string()),
            ExportError::ExportFailure { .. } => details,
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_failure_keeps_source() {
        let cause = io::Error::new(io::ErrorKind::Other, "writer closed");
        let error = ExportError::failure("Failed to write CSV", cause);
        assert_eq!(error.code(), ExportErrorCode::ExportFailure);
        assert_eq!(error.source().map(ToString::to_string).as_deref(), Some("writer closed"));
    }

    #[test]
    fn test_invalid_input_message() {
        let error = ExportError::invalid_input(NO_TRANSACTION_DATA);
        assert_eq!(error.to_string(), "No transaction data available to export");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.to_details().code, "INVALID_INPUT");
    }
}
