//! Error types for propdash-store

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Syntax error at {location}: {message}")]
    SyntaxError { location: String, message: String },

    #[error("Unsupported fixture format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Invalid fixture pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No fixture files match {pattern}")]
    NoMatches { pattern: String },

    #[error("Invalid dataset: {}", .issues.join("; "))]
    ValidationError { issues: Vec<String> },

    #[error("IO error reading {path}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Whether the caller may fall back to another data source
    pub fn is_missing_data(&self) -> bool {
        matches!(self, LoadError::NoMatches { .. })
            || matches!(self, LoadError::IoError { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
