//! Export outcome notifications

use propdash_core::{DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};

use crate::context::ExportFormat;
use crate::error::ExportErrorCode;

#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Completed {
        format: ExportFormat,
        /// Opaque success token for the notification text
        filename: String,
        location: String,
        record_count: usize,
    },
    Failed {
        format: ExportFormat,
        code: ExportErrorCode,
        severity: ErrorSeverity,
        /// User-facing message
        message: String,
        suggestions: Vec<String>,
    },
}

impl ExportEvent {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportEvent::Completed { format, .. } | ExportEvent::Failed { format, .. } => *format,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExportEvent::Completed { .. })
    }
}

impl std::fmt::Display for ExportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportEvent::Completed { filename, record_count, .. } => {
                write!(f, "Exported {} records to {}", record_count, filename)
            }
            ExportEvent::Failed { format, message, .. } => {
                write!(f, "{} export failed: {}", format.extension().to_uppercase(), message)
            }
        }
    }
}

/// Receives every export outcome
pub trait ExportNotifier: Send + Sync {
    fn notify(&self, event: &ExportEvent);
}

/// Writes export outcomes to the log
#[derive(Debug, Default)]
pub struct LogNotifier {
    errors: DefaultErrorLogger,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExportNotifier for LogNotifier {
    fn notify(&self, event: &ExportEvent) {
        match event {
            ExportEvent::Completed { location, .. } => {
                log::info!(target: "propdash::export", "{} ({})", event, location);
            }
            ExportEvent::Failed {
                format,
                code,
                severity,
                message,
                suggestions,
            } => {
                let context = ErrorContext::new(format!("export_{}", format));
                self.errors.log_error(code, *severity, message, &context);
                for suggestion in suggestions {
                    log::info!(target: "propdash::export", "hint: {}", suggestion);
                }
            }
        }
    }
}
