//! Report export for propdash
//!
//! Each renderer turns records into a complete [`ExportArtifact`] or fails
//! without producing one. [`Exporter`] hands the artifact to a
//! [`DownloadSink`] and reports the outcome to its notifiers. It keeps no
//! state between calls, so concurrent exports do not interfere.

use std::sync::Arc;

use propdash_core::{FilterCriteria, Record, RecordGroup};

pub mod columns;
pub mod context;
pub mod csv;
pub mod error;
pub mod events;
pub mod pdf;
pub mod sink;
pub mod xlsx;

pub use crate::columns::{document_columns, expense_columns, payment_columns, transaction_columns, CellFormat, ColumnDef, Field};
pub use crate::context::{ExportArtifact, ExportContext, ExportFormat};
pub use crate::csv::export_csv;
pub use crate::error::{ExportError, ExportErrorCode, ExportResult, NO_DATA, NO_TRANSACTION_DATA};
pub use crate::events::{ExportEvent, ExportNotifier, LogNotifier};
pub use crate::pdf::export_pdf;
pub use crate::sink::{DirectorySink, DownloadSink, MemorySink};
pub use crate::xlsx::export_excel;

/// What a successful export hands back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReceipt {
    /// Opaque success token
    pub filename: String,
    pub location: String,
    /// Exported record ids; the caller bumps their download counts
    pub record_ids: Vec<String>,
}

/// Render, deliver, notify
pub struct Exporter {
    sink: Arc<dyn DownloadSink>,
    notifiers: Vec<Arc<dyn ExportNotifier>>,
}

impl Exporter {
    pub fn new(sink: Arc<dyn DownloadSink>) -> Self {
        Self {
            sink,
            notifiers: Vec::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ExportNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn csv<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a Record>,
        columns: &[ColumnDef],
        report: &str,
        ctx: &ExportContext,
    ) -> ExportResult<ExportReceipt> {
        self.finish(ExportFormat::Csv, export_csv(rows, columns, report, ctx))
    }

    pub fn pdf(&self, groups: &[RecordGroup], criteria: &FilterCriteria, ctx: &ExportContext) -> ExportResult<ExportReceipt> {
        self.finish(ExportFormat::Pdf, export_pdf(groups, criteria, ctx))
    }

    pub fn excel(&self, groups: &[RecordGroup], criteria: &FilterCriteria, ctx: &ExportContext) -> ExportResult<ExportReceipt> {
        self.finish(ExportFormat::Xlsx, export_excel(groups, criteria, ctx))
    }

    fn finish(&self, format: ExportFormat, rendered: ExportResult<ExportArtifact>) -> ExportResult<ExportReceipt> {
        let delivered = rendered.and_then(|artifact| {
            let location = self.sink.deliver(&artifact)?;
            Ok(ExportReceipt {
                filename: artifact.filename,
                location,
                record_ids: artifact.record_ids,
            })
        });

        let event = match &delivered {
            Ok(receipt) => ExportEvent::Completed {
                format,
                filename: receipt.filename.clone(),
                location: receipt.location.clone(),
                record_count: receipt.record_ids.len(),
            },
            Err(error) => ExportEvent::Failed {
                format,
                code: error.code(),
                severity: error.severity(),
                message: error.to_string(),
                suggestions: error.to_details().suggestions,
            },
        };
        for notifier in &self.notifiers {
            notifier.notify(&event);
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use propdash_core::{Domain, Flow};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<ExportEvent>>,
    }

    impl ExportNotifier for Recorder {
        fn notify(&self, event: &ExportEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn ctx() -> ExportContext {
        ExportContext::new("Property Financial Report", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn groups() -> Vec<RecordGroup> {
        vec![RecordGroup::new("Transactions").with_records(vec![
            Record::new("t1", Domain::Transaction, "Rent", "Rent", "2024-01-01")
                .with_amount(9500.0)
                .with_flow(Flow::Income),
            Record::new("t2", Domain::Transaction, "Plumber", "Maintenance", "2024-01-04")
                .with_amount(1200.0)
                .with_flow(Flow::Expense),
        ])]
    }

    #[test]
    fn test_successful_export_delivers_and_notifies() {
        let sink = Arc::new(MemorySink::new());
        let recorder = Arc::new(Recorder::default());
        let exporter = Exporter::new(sink.clone())
            .with_notifier(recorder.clone())
            .with_notifier(Arc::new(LogNotifier::new()));

        let receipt = exporter.pdf(&groups(), &FilterCriteria::default(), &ctx()).unwrap();
        assert_eq!(receipt.filename, "financial-report_2024-03-09.pdf");
        assert_eq!(receipt.record_ids, vec!["t1", "t2"]);
        assert_eq!(sink.filenames(), vec!["financial-report_2024-03-09.pdf"]);

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_success());
    }

    #[test]
    fn test_failed_export_delivers_nothing() {
        let sink = Arc::new(MemorySink::new());
        let recorder = Arc::new(Recorder::default());
        let exporter = Exporter::new(sink.clone()).with_notifier(recorder.clone());

        let empty = vec![RecordGroup::new("Transactions")];
        let err = exporter.excel(&empty, &FilterCriteria::default(), &ctx()).unwrap_err();
        assert!(matches!(err, ExportError::InvalidInput { .. }));
        assert!(sink.filenames().is_empty());

        let events = recorder.events.lock().unwrap();
        match &events[0] {
            ExportEvent::Failed {
                format,
                message,
                suggestions,
                ..
            } => {
                assert_eq!(*format, ExportFormat::Xlsx);
                assert_eq!(message, "No transaction data available to export");
                assert_eq!(suggestions, &vec!["Adjust the filters so at least one record matches.".to_string()]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_csv_through_exporter() {
        let sink = Arc::new(MemorySink::new());
        let exporter = Exporter::new(sink.clone());
        let groups = groups();
        let receipt = exporter
            .csv(propdash_core::flatten(&groups), &transaction_columns(), "transactions", &ctx())
            .unwrap();
        assert_eq!(receipt.filename, "transactions_2024-03-09.csv");
        let delivered = sink.take();
        assert_eq!(delivered[0].format, ExportFormat::Csv);
    }
}
