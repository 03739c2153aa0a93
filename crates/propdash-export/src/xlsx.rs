//! XLSX workbook export: Summary, Transactions and Categories sheets

use propdash_core::{flatten, transaction_summary, FilterCriteria, Flow, Record, RecordGroup, TransactionSummary};
use propdash_utils::round_half_up;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::context::{ExportArtifact, ExportContext, ExportFormat};
use crate::error::{ExportError, ExportResult, NO_TRANSACTION_DATA};

/// Report name used in the workbook filename
pub const XLSX_REPORT_NAME: &str = "financial-report";

pub const SUMMARY_SHEET: &str = "Summary";
pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const CATEGORIES_SHEET: &str = "Categories";

const SUMMARY_WIDTHS: [f64; 2] = [26.0, 42.0];
const TRANSACTION_HEADERS: [&str; 7] = ["Date", "Description", "Category", "Property", "Type", "Status", "Amount"];
const TRANSACTION_WIDTHS: [f64; 7] = [12.0, 36.0, 18.0, 22.0, 10.0, 12.0, 16.0];
const CATEGORY_HEADERS: [&str; 5] = ["Category", "Income", "Expense", "Net", "Count"];
const CATEGORY_WIDTHS: [f64; 5] = [24.0, 16.0, 16.0, 16.0, 8.0];

struct Formats {
    bold: Format,
    money: Format,
}

impl Formats {
    fn new(ctx: &ExportContext) -> Self {
        let digits = if ctx.money.decimals == 0 {
            "#,##0".to_string()
        } else {
            format!("#,##0.{}", "0".repeat(ctx.money.decimals as usize))
        };
        Self {
            bold: Format::new().set_bold(),
            money: Format::new().set_num_format(format!("\"{}\" {}", ctx.money.code, digits)),
        }
    }
}

fn set_widths(sheet: &mut Worksheet, widths: &[f64]) -> Result<(), XlsxError> {
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }
    Ok(())
}

fn summary_sheet(
    summary: &TransactionSummary,
    record_count: usize,
    criteria: &FilterCriteria,
    ctx: &ExportContext,
    formats: &Formats,
) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    set_widths(&mut sheet, &SUMMARY_WIDTHS)?;

    let mut row: u32 = 0;
    let mut pair = |sheet: &mut Worksheet, label: &str, value: &str| -> Result<(), XlsxError> {
        sheet.write_string_with_format(row, 0, label, &formats.bold)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
        Ok(())
    };
    pair(&mut sheet, "Report", &ctx.report_title)?;
    if let Some(ref company) = ctx.company_name {
        pair(&mut sheet, "Company", company)?;
    }
    pair(&mut sheet, "Generated", &ctx.generated_on.format("%Y-%m-%d").to_string())?;
    for (label, value) in criteria.summary(&ctx.properties) {
        pair(&mut sheet, &label, &value)?;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Metric", &formats.bold)?;
    sheet.write_string_with_format(row, 1, "Value", &formats.bold)?;
    row += 1;

    let money_rows = [
        ("Total Income", summary.total_income),
        ("Total Expenses", summary.total_expenses),
        ("Net Income", summary.net_income),
    ];
    for (label, value) in money_rows {
        sheet.write_string(row, 0, label)?;
        sheet.write_number_with_format(row, 1, value, &formats.money)?;
        row += 1;
    }
    let plain_rows = [
        ("Profit Margin (%)", round_half_up(summary.profit_margin, ctx.percentage_decimals)),
        ("Transactions", summary.transaction_count as f64),
        ("Income Transactions", summary.income_count as f64),
        ("Expense Transactions", summary.expense_count as f64),
        ("Records Exported", record_count as f64),
    ];
    for (label, value) in plain_rows {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, value)?;
        row += 1;
    }

    Ok(sheet)
}

fn transactions_sheet(records: &[&Record], ctx: &ExportContext, formats: &Formats) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(TRANSACTIONS_SHEET)?;
    set_widths(&mut sheet, &TRANSACTION_WIDTHS)?;
    write_headers(&mut sheet, &TRANSACTION_HEADERS, &formats.bold)?;

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        let kind = match record.flow {
            Some(Flow::Income) => "Income",
            Some(Flow::Expense) => "Expense",
            None => "",
        };
        let property = match record.property_id {
            Some(_) => ctx.properties.display_name(record.property_id),
            None => String::new(),
        };
        sheet.write_string(row, 0, &record.date)?;
        sheet.write_string(row, 1, &record.name)?;
        sheet.write_string(row, 2, &record.category)?;
        sheet.write_string(row, 3, &property)?;
        sheet.write_string(row, 4, kind)?;
        sheet.write_string(row, 5, record.status.as_deref().unwrap_or(""))?;
        if let Some(amount) = record.amount {
            sheet.write_number_with_format(row, 6, amount, &formats.money)?;
        }
    }

    Ok(sheet)
}

fn categories_sheet(summary: &TransactionSummary, formats: &Formats) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(CATEGORIES_SHEET)?;
    set_widths(&mut sheet, &CATEGORY_WIDTHS)?;
    write_headers(&mut sheet, &CATEGORY_HEADERS, &formats.bold)?;

    for (index, category) in summary.categories.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &category.category)?;
        sheet.write_number_with_format(row, 1, category.income, &formats.money)?;
        sheet.write_number_with_format(row, 2, category.expense, &formats.money)?;
        sheet.write_number_with_format(row, 3, category.net, &formats.money)?;
        sheet.write_number(row, 4, category.count as f64)?;
    }

    Ok(sheet)
}

/// Render the three-sheet workbook for the records in `groups`
pub fn export_excel(
    groups: &[RecordGroup],
    criteria: &FilterCriteria,
    ctx: &ExportContext,
) -> ExportResult<ExportArtifact> {
    let records: Vec<&Record> = flatten(groups).collect();
    if records.is_empty() {
        return Err(ExportError::invalid_input(NO_TRANSACTION_DATA));
    }

    let summary = transaction_summary(records.iter().copied());
    let formats = Formats::new(ctx);
    let build = || -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(summary_sheet(&summary, records.len(), criteria, ctx, &formats)?);
        workbook.push_worksheet(transactions_sheet(&records, ctx, &formats)?);
        workbook.push_worksheet(categories_sheet(&summary, &formats)?);
        workbook.save_to_buffer()
    };
    let bytes = build().map_err(|e| ExportError::failure("Failed to build workbook", e))?;

    log::debug!(
        "Rendered workbook with {} rows and {} categories",
        records.len(),
        summary.categories.len()
    );
    Ok(ExportArtifact::new(
        ctx.filename(XLSX_REPORT_NAME, ExportFormat::Xlsx),
        ExportFormat::Xlsx,
        bytes,
        records,
    ))
}
