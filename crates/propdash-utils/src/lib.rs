//! Utility functions and helpers
//!
//! Display formatting for amounts, percentages and file sizes. Every
//! rounding step goes through [`round_half_up`], so on-screen cards and
//! exported reports agree on the last digit.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Currency presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyFormat {
    pub code: String,
    pub decimals: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub symbol_before: bool,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            code: "AED".to_string(),
            decimals: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            symbol_before: true,
        }
    }
}

/// Round to `dp` decimal places, halves away from zero.
///
/// Goes through `Decimal` so that values like `2.675` round the way they
/// read rather than the way their binary form does.
pub fn round_half_up(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}

/// Fixed-point string with `dp` decimals, rounded half away from zero
pub fn format_decimal(value: f64, dp: u32) -> String {
    // Decimal covers roughly +-7.9e28; anything outside keeps its f64 form
    match Decimal::from_f64(value) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", dp as usize, rounded)
        }
        None => format!("{:.*}", dp as usize, value),
    }
}

/// Insert a separator every three digits of an unsigned integer string
fn group_thousands(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(c);
    }
    result
}

/// Format a number with thousands separators
pub fn format_number(value: f64, dp: u32) -> String {
    format_grouped(value, dp, ",", ".")
}

fn format_grouped(value: f64, dp: u32, thousands: &str, decimal: &str) -> String {
    let fixed = format_decimal(value, dp);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    // "-0.00" is not worth a sign
    let sign = if unsigned.chars().all(|c| c == '0' || c == '.') { "" } else { sign };

    let mut out = format!("{}{}", sign, group_thousands(int_part, thousands));
    if let Some(frac) = frac_part {
        out.push_str(decimal);
        out.push_str(frac);
    }
    out
}

/// Format an amount as money, e.g. `AED 1,250.00`
pub fn format_currency(amount: f64, format: &MoneyFormat) -> String {
    let number = format_grouped(
        amount,
        format.decimals,
        &format.thousands_separator,
        &format.decimal_separator,
    );
    if format.symbol_before {
        format!("{} {}", format.code, number)
    } else {
        format!("{} {}", number, format.code)
    }
}

/// Format a percentage value (already scaled to 0-100), e.g. `57.1%`
pub fn format_percent(value: f64, dp: u32) -> String {
    format!("{}%", format_decimal(value, dp))
}

/// Human-readable file size with binary units
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{} {}", format_decimal(size, 1), UNITS[unit])
    }
}

/// Turn a status badge value such as `in_progress` into `In Progress`
pub fn title_case(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Lower-case, dash-separated form safe for filenames
pub fn slugify(value: &str) -> String {
    let lower = value.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// `{report}_{YYYY-MM-DD}.{ext}`
pub fn report_filename(report: &str, date: NaiveDate, extension: &str) -> String {
    let slug = slugify(report);
    let slug = if slug.is_empty() { "report".to_string() } else { slug };
    format!("{}_{}.{}", slug, date.format("%Y-%m-%d"), extension)
}

/// Check a `YYYY-MM-DD` string names a real calendar date
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(57.142857, 0), 57.0);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(-2.5, 0), -3.0);
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(12.35, 1), 12.4);
    }

    #[test]
    fn test_format_decimal_pads() {
        assert_eq!(format_decimal(3.0, 2), "3.00");
        assert_eq!(format_decimal(2389.3333, 2), "2389.33");
        assert_eq!(format_decimal(0.05, 1), "0.1");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1000.0, 0), "-1,000");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_currency() {
        let fmt = MoneyFormat::default();
        assert_eq!(format_currency(1250.0, &fmt), "AED 1,250.00");
        assert_eq!(format_currency(-75.5, &fmt), "AED -75.50");

        let after = MoneyFormat {
            code: "EUR".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            symbol_before: false,
            ..MoneyFormat::default()
        };
        assert_eq!(format_currency(1234.5, &after), "1.234,50 EUR");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(57.14, 1), "57.1%");
        assert_eq!(format_percent(0.0, 1), "0.0%");
        assert_eq!(format_percent(33.35, 1), "33.4%");
    }

    #[test]
    fn test_values_outside_decimal_range_keep_their_value() {
        assert_eq!(format_decimal(1e30, 2), format!("{:.2}", 1e30_f64));
        assert!(format_number(1e30, 0).starts_with("1,000,000,000,000,000,0"));

        let money = format_currency(-1e30, &MoneyFormat::default());
        assert!(money.starts_with("AED -1,000,000,000"));
        assert_ne!(money, "AED 0.00");

        assert_eq!(format_percent(f64::NAN, 1), "NaN%");
        assert_eq!(format_decimal(f64::INFINITY, 2), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY, 2), "-inf");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("overdue"), "Overdue");
        assert_eq!(title_case("in_progress"), "In Progress");
        assert_eq!(title_case("PAID"), "Paid");
    }

    #[test]
    fn test_report_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            report_filename("Financial Report", date, "pdf"),
            "financial-report_2024-03-09.pdf"
        );
        assert_eq!(report_filename("!!", date, "csv"), "report_2024-03-09.csv");
    }

    #[test]
    fn test_iso_dates() {
        assert!(is_iso_date("2024-02-29"));
        assert!(!is_iso_date("2023-02-29"));
        assert!(!is_iso_date("2024-2-9"));
        assert_eq!(
            parse_iso_date("2024-06-15"),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert_eq!(parse_iso_date("15/06/2024"), None);
    }
}
