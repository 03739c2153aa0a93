//! Export settings and rendered artifacts

use chrono::{Local, NaiveDate};
use propdash_config::Config;
use propdash_core::{PropertyDirectory, Record};
use propdash_utils::{format_currency, format_percent, report_filename, MoneyFormat};
use serde::{Deserialize, Serialize};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(format!("Invalid export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Everything a renderer needs besides the records themselves
#[derive(Debug, Clone)]
pub struct ExportContext {
    /// Title printed at the top of PDF and workbook reports
    pub report_title: String,
    pub company_name: Option<String>,
    /// Date stamped into headers and filenames
    pub generated_on: NaiveDate,
    pub money: MoneyFormat,
    pub percentage_decimals: u32,
    /// Resolves property ids to names
    pub properties: PropertyDirectory,
}

impl ExportContext {
    pub fn new(report_title: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            report_title: report_title.into(),
            company_name: None,
            generated_on,
            money: MoneyFormat::default(),
            percentage_decimals: 1,
            properties: PropertyDirectory::default(),
        }
    }

    /// Settings from the loaded configuration, dated today
    pub fn from_config(config: &Config, properties: PropertyDirectory) -> Self {
        Self {
            report_title: config.export.report_title.clone(),
            company_name: config.export.company_name.clone(),
            generated_on: Local::now().date_naive(),
            money: config.currency.money_format(),
            percentage_decimals: config.display.percentage_decimals,
            properties,
        }
    }

    pub fn with_properties(mut self, properties: PropertyDirectory) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_money(mut self, money: MoneyFormat) -> Self {
        self.money = money;
        self
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn currency(&self, amount: f64) -> String {
        format_currency(amount, &self.money)
    }

    pub fn percent(&self, value: f64) -> String {
        format_percent(value, self.percentage_decimals)
    }

    /// `{report}_{YYYY-MM-DD}.{ext}` for this context's date
    pub fn filename(&self, report: &str, format: ExportFormat) -> String {
        report_filename(report, self.generated_on, format.extension())
    }
}

/// A fully rendered export, ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Ids of the exported records, for the caller's download counter
    pub record_ids: Vec<String>,
}

impl ExportArtifact {
    pub(crate) fn new<'a>(
        filename: String,
        format: ExportFormat,
        bytes: Vec<u8>,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Self {
        Self {
            filename,
            format,
            bytes,
            record_ids: records.into_iter().map(|r| r.id().to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_filename_uses_context_date() {
        let ctx = ExportContext::new("Report", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(ctx.filename("Financial Report", ExportFormat::Pdf), "financial-report_2024-03-09.pdf");
        assert_eq!(ctx.filename("transactions", ExportFormat::Csv), "transactions_2024-03-09.csv");
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.export.company_name = Some("Gulf Estates".to_string());
        config.currency.default_currency = "USD".to_string();
        let ctx = ExportContext::from_config(&config, PropertyDirectory::default());
        assert_eq!(ctx.company_name.as_deref(), Some("Gulf Estates"));
        assert_eq!(ctx.currency(1250.0), "USD 1,250.00");
        assert_eq!(ctx.percent(57.14), "57.1%");
    }
}
