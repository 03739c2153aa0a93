//! Column definitions for tabular exports

use propdash_core::{Flow, Record};
use propdash_utils::{format_file_size, parse_iso_date, title_case};

use crate::context::ExportContext;

/// A record field a column can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Description,
    Category,
    Property,
    Date,
    DueDate,
    Amount,
    Status,
    Type,
    FileType,
    Size,
    Tags,
    Rating,
    UploadedBy,
    DownloadCount,
}

/// How a cell value is rendered to text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFormat {
    #[default]
    Text,
    /// Money in the context's currency
    Currency,
    /// `YYYY-MM-DD` shown as `15 Jan 2024`
    Date,
    /// Status-style value shown title-cased
    Badge,
    /// Bytes shown as `1.5 MB`
    FileSize,
    /// Tag list joined with `; `
    Tags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub field: Field,
    pub header: String,
    pub format: CellFormat,
}

impl ColumnDef {
    pub fn new(field: Field, header: impl Into<String>, format: CellFormat) -> Self {
        Self {
            field,
            header: header.into(),
            format,
        }
    }

    pub fn text(field: Field, header: impl Into<String>) -> Self {
        Self::new(field, header, CellFormat::Text)
    }

    /// Cell text for one record; missing values render as an empty string
    pub fn render(&self, record: &Record, ctx: &ExportContext) -> String {
        match self.format {
            CellFormat::Currency => match numeric(self.field, record) {
                Some(value) => ctx.currency(value),
                None => String::new(),
            },
            CellFormat::FileSize => match numeric(self.field, record) {
                Some(value) if value >= 0.0 => format_file_size(value as u64),
                _ => String::new(),
            },
            CellFormat::Date => {
                let raw = raw_text(self.field, record, ctx);
                match parse_iso_date(&raw) {
                    Some(date) => date.format("%d %b %Y").to_string(),
                    None => raw,
                }
            }
            CellFormat::Badge => title_case(&raw_text(self.field, record, ctx)),
            CellFormat::Tags => record.tags.join("; "),
            CellFormat::Text => raw_text(self.field, record, ctx),
        }
    }
}

fn numeric(field: Field, record: &Record) -> Option<f64> {
    match field {
        Field::Amount => record.amount,
        Field::Size => record.size.map(|s| s as f64),
        Field::Rating => record.rating.map(f64::from),
        Field::DownloadCount => Some(f64::from(record.download_count)),
        _ => None,
    }
}

fn raw_text(field: Field, record: &Record, ctx: &ExportContext) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    match field {
        Field::Id => record.id().to_string(),
        Field::Name => record.name.clone(),
        Field::Description => optional(&record.description),
        Field::Category => record.category.clone(),
        Field::Property => match record.property_id {
            Some(_) => ctx.properties.display_name(record.property_id),
            None => String::new(),
        },
        Field::Date => record.date.clone(),
        Field::DueDate => optional(&record.due_date),
        Field::Status => optional(&record.status),
        Field::Type => match record.flow {
            Some(Flow::Income) => "income".to_string(),
            Some(Flow::Expense) => "expense".to_string(),
            None => String::new(),
        },
        Field::FileType => record.file_type.as_deref().map(str::to_uppercase).unwrap_or_default(),
        Field::Tags => record.tags.join("; "),
        Field::UploadedBy => optional(&record.uploaded_by),
        Field::Amount | Field::Size | Field::Rating | Field::DownloadCount => {
            numeric(field, record).map(|v| v.to_string()).unwrap_or_default()
        }
    }
}

pub fn document_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::text(Field::Name, "Name"),
        ColumnDef::text(Field::Category, "Category"),
        ColumnDef::text(Field::Property, "Property"),
        ColumnDef::text(Field::FileType, "Type"),
        ColumnDef::new(Field::Size, "Size", CellFormat::FileSize),
        ColumnDef::new(Field::Date, "Uploaded", CellFormat::Date),
        ColumnDef::text(Field::UploadedBy, "Uploaded By"),
        ColumnDef::new(Field::Tags, "Tags", CellFormat::Tags),
        ColumnDef::text(Field::DownloadCount, "Downloads"),
    ]
}

pub fn transaction_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(Field::Date, "Date", CellFormat::Date),
        ColumnDef::text(Field::Name, "Description"),
        ColumnDef::text(Field::Category, "Category"),
        ColumnDef::text(Field::Property, "Property"),
        ColumnDef::new(Field::Type, "Type", CellFormat::Badge),
        ColumnDef::new(Field::Amount, "Amount", CellFormat::Currency),
        ColumnDef::new(Field::Status, "Status", CellFormat::Badge),
    ]
}

pub fn payment_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::text(Field::Name, "Tenant"),
        ColumnDef::text(Field::Property, "Property"),
        ColumnDef::new(Field::Amount, "Amount", CellFormat::Currency),
        ColumnDef::new(Field::DueDate, "Due Date", CellFormat::Date),
        ColumnDef::new(Field::Date, "Paid On", CellFormat::Date),
        ColumnDef::new(Field::Status, "Status", CellFormat::Badge),
    ]
}

pub fn expense_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(Field::Date, "Date", CellFormat::Date),
        ColumnDef::text(Field::Name, "Description"),
        ColumnDef::text(Field::Category, "Category"),
        ColumnDef::text(Field::Property, "Property"),
        ColumnDef::new(Field::Amount, "Amount", CellFormat::Currency),
        ColumnDef::new(Field::Status, "Status", CellFormat::Badge),
    ]
}
