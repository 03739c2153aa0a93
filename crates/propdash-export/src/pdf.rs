//! Paginated PDF report
//!
//! Page one carries the report header, the active filters and a summary
//! table; detail rows follow and continue on later pages, each of which
//! repeats the table header and is numbered "Page i of n".

use std::io::BufWriter;
use std::ops::Range;

use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb};
use propdash_core::{flatten, transaction_summary, FilterCriteria, Flow, Record, RecordGroup};
use propdash_utils::title_case;

use crate::context::{ExportArtifact, ExportContext, ExportFormat};
use crate::error::{ExportError, ExportResult, NO_TRANSACTION_DATA};

/// Report name used in the PDF filename
pub const PDF_REPORT_NAME: &str = "financial-report";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;
const ROW_HEIGHT: f32 = 6.0;
const BOTTOM: f32 = 25.0;
/// Detail table header on page one, below the summary block
const FIRST_TABLE_TOP: f32 = 170.0;
const TABLE_TOP: f32 = 275.0;
const FONT_SIZE: f32 = 9.0;
/// Average Helvetica glyph width as a share of the font size
const GLYPH_WIDTH: f32 = 0.55;
const PT_TO_MM: f32 = 0.3528;

/// Detail rows that fit on page one
pub const FIRST_PAGE_ROWS: usize = ((FIRST_TABLE_TOP - ROW_HEIGHT - BOTTOM) / ROW_HEIGHT) as usize;
/// Detail rows that fit on every later page
pub const ROWS_PER_PAGE: usize = ((TABLE_TOP - ROW_HEIGHT - BOTTOM) / ROW_HEIGHT) as usize;

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
}

struct DetailColumn {
    header: &'static str,
    x: f32,
    width: f32,
    align: Align,
}

const DETAIL_COLUMNS: [DetailColumn; 6] = [
    DetailColumn { header: "Date", x: 15.0, width: 21.0, align: Align::Left },
    DetailColumn { header: "Description", x: 37.0, width: 54.0, align: Align::Left },
    DetailColumn { header: "Category", x: 92.0, width: 29.0, align: Align::Left },
    DetailColumn { header: "Property", x: 122.0, width: 32.0, align: Align::Left },
    DetailColumn { header: "Type", x: 155.0, width: 14.0, align: Align::Left },
    DetailColumn { header: "Amount", x: 195.0, width: 25.0, align: Align::Right },
];

/// Split `rows` detail rows into page ranges: `first` rows on page one,
/// `rest` on each later page. Always yields at least one page.
pub fn plan_pages(rows: usize, first: usize, rest: usize) -> Vec<Range<usize>> {
    let first_end = rows.min(first);
    let mut pages = vec![0..first_end];
    let mut start = first_end;
    while start < rows && rest > 0 {
        let end = (start + rest).min(rows);
        pages.push(start..end);
        start = end;
    }
    pages
}

/// Page ranges for the default A4 layout
pub fn page_plan(rows: usize) -> Vec<Range<usize>> {
    plan_pages(rows, FIRST_PAGE_ROWS, ROWS_PER_PAGE)
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH * PT_TO_MM
}

/// Cut `text` so it fits in `width` mm, marking the cut with "..."
fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = (width / (size * GLYPH_WIDTH * PT_TO_MM)) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn black() -> Color {
    rgb(0.0, 0.0, 0.0)
}

fn row_color(record: &Record) -> Color {
    match record.flow {
        Some(Flow::Income) => rgb(0.10, 0.50, 0.20),
        Some(Flow::Expense) => rgb(0.75, 0.12, 0.12),
        None => black(),
    }
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(LEFT), Mm(y)), false),
            (Point::new(Mm(RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn push_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, x: f32, y: f32) {
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn detail_cells(record: &Record, ctx: &ExportContext) -> [String; 6] {
    let kind = match record.flow {
        Some(Flow::Income) => "Income".to_string(),
        Some(Flow::Expense) => "Expense".to_string(),
        None => title_case(&record.domain.to_string()),
    };
    let amount = record.amount.map(|a| ctx.currency(a)).unwrap_or_default();
    let property = match record.property_id {
        Some(_) => ctx.properties.display_name(record.property_id),
        None => String::new(),
    };
    [
        record.date.clone(),
        record.name.clone(),
        record.category.clone(),
        property,
        kind,
        amount,
    ]
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn table_header(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
    layer.set_fill_color(black());
    for column in &DETAIL_COLUMNS {
        let x = match column.align {
            Align::Left => column.x,
            Align::Right => column.x - text_width(column.header, FONT_SIZE),
        };
        push_text(layer, &fonts.bold, column.header, FONT_SIZE, x, y);
    }
    rule(layer, y - 2.0);
}

fn report_header(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    records: &[&Record],
    criteria: &FilterCriteria,
    ctx: &ExportContext,
) {
    layer.set_fill_color(black());
    push_text(layer, &fonts.bold, &ctx.report_title, 18.0, LEFT, 280.0);

    let mut generated = format!("Generated: {}", ctx.generated_on.format("%Y-%m-%d"));
    if let Some(ref company) = ctx.company_name {
        generated = format!("{} | {}", company, generated);
    }
    push_text(layer, &fonts.regular, &generated, 10.0, LEFT, 273.0);
    rule(layer, 269.0);

    push_text(layer, &fonts.bold, "Filters", 11.0, LEFT, 263.0);
    let mut y = 258.0;
    for (label, value) in criteria.summary(&ctx.properties).into_iter().take(6) {
        push_text(layer, &fonts.regular, &format!("{}: {}", label, value), FONT_SIZE, LEFT + 2.0, y);
        y -= 5.0;
    }

    let summary = transaction_summary(records.iter().copied());
    let rows = [
        ("Total Income", ctx.currency(summary.total_income)),
        ("Total Expenses", ctx.currency(summary.total_expenses)),
        ("Net Income", ctx.currency(summary.net_income)),
        ("Profit Margin", ctx.percent(summary.profit_margin)),
        ("Income Transactions", summary.income_count.to_string()),
        ("Expense Transactions", summary.expense_count.to_string()),
    ];
    push_text(layer, &fonts.bold, "Summary", 11.0, LEFT, 220.0);
    rule(layer, 217.0);
    let mut y = 212.0;
    for (label, value) in rows {
        push_text(layer, &fonts.regular, label, 10.0, LEFT + 2.0, y);
        push_text(layer, &fonts.bold, &value, 10.0, 110.0 - text_width(&value, 10.0), y);
        y -= ROW_HEIGHT;
    }

    push_text(layer, &fonts.bold, "Details", 11.0, LEFT, FIRST_TABLE_TOP + 7.0);
}

fn footer(layer: &PdfLayerReference, fonts: &Fonts, ctx: &ExportContext, page: usize, pages: usize) {
    layer.set_fill_color(rgb(0.4, 0.4, 0.4));
    let left = ctx.company_name.as_deref().unwrap_or(&ctx.report_title);
    push_text(layer, &fonts.regular, left, 8.0, LEFT, 12.0);
    let label = format!("Page {} of {}", page, pages);
    push_text(layer, &fonts.regular, &label, 8.0, RIGHT - text_width(&label, 8.0), 12.0);
}

/// Render the financial report for the records in `groups`
pub fn export_pdf(
    groups: &[RecordGroup],
    criteria: &FilterCriteria,
    ctx: &ExportContext,
) -> ExportResult<ExportArtifact> {
    let records: Vec<&Record> = flatten(groups).collect();
    if records.is_empty() {
        return Err(ExportError::invalid_input(NO_TRANSACTION_DATA));
    }

    let pages = page_plan(records.len());
    let (doc, first_page, first_layer) =
        PdfDocument::new(ctx.report_title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::failure("Failed to load PDF font", e))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::failure("Failed to load PDF font", e))?,
    };

    for (index, range) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let top = if index == 0 {
            report_header(&layer, &fonts, &records, criteria, ctx);
            FIRST_TABLE_TOP
        } else {
            TABLE_TOP
        };
        table_header(&layer, &fonts, top);

        let mut y = top - ROW_HEIGHT - 1.0;
        for record in &records[range.clone()] {
            layer.set_fill_color(row_color(record));
            let cells = detail_cells(record, ctx);
            for (column, cell) in DETAIL_COLUMNS.iter().zip(cells.iter()) {
                let text = fit(cell, column.width, FONT_SIZE);
                let x = match column.align {
                    Align::Left => column.x,
                    Align::Right => column.x - text_width(&text, FONT_SIZE),
                };
                push_text(&layer, &fonts.regular, &text, FONT_SIZE, x, y);
            }
            y -= ROW_HEIGHT;
        }

        footer(&layer, &fonts, ctx, index + 1, pages.len());
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| ExportError::failure("Failed to render PDF", e))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::failure("Failed to finish PDF", e.into_error()))?;

    log::debug!("Rendered PDF with {} rows on {} pages", records.len(), pages.len());
    Ok(ExportArtifact::new(
        ctx.filename(PDF_REPORT_NAME, ExportFormat::Pdf),
        ExportFormat::Pdf,
        bytes,
        records,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use propdash_core::Domain;

    fn ctx() -> ExportContext {
        ExportContext::new("Property Financial Report", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn groups(count: usize) -> Vec<RecordGroup> {
        let records = (0..count)
            .map(|i| {
                let flow = if i % 3 == 0 { Flow::Expense } else { Flow::Income };
                Record::new(format!("t{}", i), Domain::Transaction, format!("Entry {}", i), "Rent", "2024-02-01")
                    .with_amount(100.0 + i as f64)
                    .with_flow(flow)
            })
            .collect();
        vec![RecordGroup::new("Transactions").with_records(records)]
    }

    #[test]
    fn test_plan_pages() {
        assert_eq!(plan_pages(0, 20, 40), vec![0..0]);
        assert_eq!(plan_pages(20, 20, 40), vec![0..20]);
        assert_eq!(plan_pages(21, 20, 40), vec![0..20, 20..21]);
        assert_eq!(plan_pages(100, 20, 40), vec![0..20, 20..60, 60..100]);
        assert_eq!(plan_pages(101, 20, 40).len(), 4);
    }

    #[test]
    fn test_page_plan_covers_every_row() {
        for rows in [1, FIRST_PAGE_ROWS, FIRST_PAGE_ROWS + 1, 250] {
            let plan = page_plan(rows);
            assert_eq!(plan.first().map(|r| r.start), Some(0));
            assert_eq!(plan.last().map(|r| r.end), Some(rows));
            let expected = 1 + (rows.saturating_sub(FIRST_PAGE_ROWS) + ROWS_PER_PAGE - 1) / ROWS_PER_PAGE;
            assert_eq!(plan.len(), expected);
        }
    }

    #[test]
    fn test_fit_truncates() {
        assert_eq!(fit("Rent", 20.0, FONT_SIZE), "Rent");
        let long = "A very long description that will not fit in the column";
        let cut = fit(long, 20.0, FONT_SIZE);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() < long.chars().count());
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = export_pdf(&[RecordGroup::new("Transactions")], &FilterCriteria::default(), &ctx()).unwrap_err();
        assert_eq!(err.to_string(), "No transaction data available to export");
    }

    #[test]
    fn test_export_pdf_bytes() {
        let artifact = export_pdf(&groups(90), &FilterCriteria::default(), &ctx()).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.filename, "financial-report_2024-03-09.pdf");
        assert_eq!(artifact.record_ids.len(), 90);
    }
}
