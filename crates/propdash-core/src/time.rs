//! Time windows for narrowing records by date

use chrono::{Datelike, Local, NaiveDate};
use propdash_config::TimeRange;

/// A named date window (month, quarter, year) or a custom range
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    /// Current time range
    pub range: TimeRange,
    /// Custom start date (when range is Custom)
    pub custom_start: Option<NaiveDate>,
    /// Custom end date (when range is Custom)
    pub custom_end: Option<NaiveDate>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::new(TimeRange::All)
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of `year-month`
fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    first_of_month(next_year, next_month).and_then(|d| d.pred_opt())
}

impl TimeContext {
    /// Create a new time context
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Create with custom date range; either end may be open
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    /// Start of the window relative to `today`
    pub fn start_date_at(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => first_of_month(today.year(), today.month()),
            TimeRange::Quarter => {
                let quarter_start = (today.month0() / 3) * 3 + 1;
                first_of_month(today.year(), quarter_start)
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_start,
        }
    }

    /// Inclusive end of the window relative to `today`
    pub fn end_date_at(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => last_of_month(today.year(), today.month()),
            TimeRange::Quarter => {
                let quarter_end = (today.month0() / 3) * 3 + 3;
                last_of_month(today.year(), quarter_end)
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 12, 31),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_end,
        }
    }

    /// Window bounds relative to `today`
    pub fn bounds_at(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.start_date_at(today), self.end_date_at(today))
    }

    /// Window bounds relative to the local date
    pub fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        self.bounds_at(Local::now().date_naive())
    }

    /// Check if a date is within the window relative to `today`
    pub fn contains_at(&self, date: &NaiveDate, today: NaiveDate) -> bool {
        match self.bounds_at(today) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Get a human-readable description of the time range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Current Month".to_string(),
            TimeRange::Quarter => "Current Quarter".to_string(),
            TimeRange::Year => "Current Year".to_string(),
            TimeRange::All => "All Time".to_string(),
            TimeRange::Custom => match (self.custom_start, self.custom_end) {
                (Some(start), Some(end)) => format!("{} to {}", start, end),
                (Some(start), None) => format!("From {}", start),
                (None, Some(end)) => format!("Until {}", end),
                (None, None) => "Custom Range".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_window() {
        let ctx = TimeContext::new(TimeRange::Month);
        assert_eq!(ctx.bounds_at(date(2024, 2, 10)), (Some(date(2024, 2, 1)), Some(date(2024, 2, 29))));
    }

    #[test]
    fn test_month_window_december() {
        let ctx = TimeContext::new(TimeRange::Month);
        assert_eq!(ctx.end_date_at(date(2024, 12, 3)), Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_quarter_window() {
        let ctx = TimeContext::new(TimeRange::Quarter);
        assert_eq!(ctx.bounds_at(date(2024, 5, 20)), (Some(date(2024, 4, 1)), Some(date(2024, 6, 30))));
        assert_eq!(ctx.bounds_at(date(2024, 11, 1)), (Some(date(2024, 10, 1)), Some(date(2024, 12, 31))));
    }

    #[test]
    fn test_year_and_all() {
        let today = date(2024, 7, 4);
        let year = TimeContext::new(TimeRange::Year);
        assert_eq!(year.bounds_at(today), (Some(date(2024, 1, 1)), Some(date(2024, 12, 31))));
        assert_eq!(TimeContext::new(TimeRange::All).bounds_at(today), (None, None));
    }

    #[test]
    fn test_contains_custom_open_end() {
        let ctx = TimeContext::custom(Some(date(2024, 1, 1)), None);
        let today = date(2030, 1, 1);
        assert!(ctx.contains_at(&date(2025, 6, 1), today));
        assert!(!ctx.contains_at(&date(2023, 12, 31), today));
    }

    #[test]
    fn test_description() {
        assert_eq!(TimeContext::new(TimeRange::Quarter).description(), "Current Quarter");
        let ctx = TimeContext::custom(Some(date(2024, 1, 1)), Some(date(2024, 3, 31)));
        assert_eq!(ctx.description(), "2024-01-01 to 2024-03-31");
    }
}
