//! CSV export

use csv::Writer;
use propdash_core::Record;

use crate::columns::ColumnDef;
use crate::context::{ExportArtifact, ExportContext, ExportFormat};
use crate::error::{ExportError, ExportResult, NO_DATA};

/// Write a header row then one row per record.
///
/// Quoting of delimiters, quotes and newlines is left to the `csv` writer.
pub fn export_csv<'a>(
    rows: impl IntoIterator<Item = &'a Record>,
    columns: &[ColumnDef],
    report: &str,
    ctx: &ExportContext,
) -> ExportResult<ExportArtifact> {
    let rows: Vec<&Record> = rows.into_iter().collect();
    if rows.is_empty() {
        return Err(ExportError::invalid_input(NO_DATA));
    }
    if columns.is_empty() {
        return Err(ExportError::invalid_input("No columns selected for export"));
    }

    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(columns.iter().map(|c| c.header.as_str()))
        .map_err(|e| ExportError::failure("Failed to write CSV header", e))?;

    for record in &rows {
        wtr.write_record(columns.iter().map(|c| c.render(record, ctx)))
            .map_err(|e| ExportError::failure(format!("Failed to write CSV row {}", record.id()), e))?;
    }

    wtr.flush()
        .map_err(|e| ExportError::failure("Failed to flush CSV", e))?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::failure("Failed to finish CSV", e.into_error()))?;

    log::debug!("Rendered CSV with {} rows and {} columns", rows.len(), columns.len());
    Ok(ExportArtifact::new(
        ctx.filename(report, ExportFormat::Csv),
        ExportFormat::Csv,
        bytes,
        rows,
    ))
}
