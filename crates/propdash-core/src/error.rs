//! Error types for propdash-core
//!
//! Filtering and statistics never fail; these errors come from the
//! entity store and from callers validating their input.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    RecordNotFound,
    /// Duplicate record id
    DuplicateEntry,
    /// Missing or unusable input
    InvalidInput,
    /// Validation error
    ValidationError,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::RecordNotFound => write!(f, "RECORD_NOT_FOUND"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for user-facing notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code, as a string so other crates can reuse this shape
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: impl ToString, message: String) -> Self {
        Self {
            code: code.to_string(),
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl ErrorSeverity {
    /// Matching `log` level
    pub fn log_level(&self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for propdash-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    #[error("Duplicate record id: {id}")]
    DuplicateEntry { id: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            CoreError::DuplicateEntry { .. } => ErrorCode::DuplicateEntry,
            CoreError::InvalidInput { .. } => ErrorCode::InvalidInput,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::RecordNotFound { .. } => ErrorSeverity::Info,
            CoreError::DuplicateEntry { .. } => ErrorSeverity::Warning,
            CoreError::InvalidInput { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::RecordNotFound { .. } => {
                details = details.with_suggestion(
                    "Check the record id; it may have been removed already.".to_string(),
                );
            }
            CoreError::DuplicateEntry { id } => {
                details = details
                    .with_detail(serde_json::json!({ "id": id }))
                    .with_suggestion("Record ids must be unique across all groups.".to_string());
            }
            CoreError::ValidationError { message } => {
                details = details
                    .with_detail(serde_json::json!({ "validation_message": message }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Where an error happened, for logging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Operation being performed, e.g. "export_pdf"
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error at the level its severity maps to
    fn log_error(&self, code: &dyn std::fmt::Display, severity: ErrorSeverity, message: &str, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using the log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl DefaultErrorLogger {
    /// Log a core error with its code and severity
    pub fn log_core_error(&self, error: &CoreError, context: &ErrorContext) {
        self.log_error(&error.code(), error.severity(), &error.to_string(), context);
    }
}

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, code: &dyn std::fmt::Display, severity: ErrorSeverity, message: &str, context: &ErrorContext) {
        log::log!(
            target: "propdash::error",
            severity.log_level(),
            "[{}] {} - Operation: {} - Data: {}",
            code,
            message,
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "propdash::error",
            "WARNING: {} - Operation: {}",
            message,
            context.operation
        );
    }
}
