//! Filter engine: criteria filtering and free-text search over record groups
//!
//! Both operations are pure. They return new groups and leave the input
//! untouched. Filtering keeps every group, even ones it empties; search
//! drops groups without a single match.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::models::{PropertyDirectory, PropertyId, Record, RecordGroup};
use crate::time::TimeContext;
use crate::types::Flow;

/// A filter selector: everything, or one specific value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

/// "All Categories", "All Properties", "all" and "" all mean no restriction
fn is_sentinel(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.is_empty() || lower == "all" || lower.starts_with("all ")
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr> Choice<T> {
    /// Parse a UI selector value, honouring the "All ..." sentinels
    pub fn parse(value: &str) -> Result<Self, T::Err> {
        let value = value.trim();
        if is_sentinel(value) {
            Ok(Choice::All)
        } else {
            value.parse().map(Choice::Only)
        }
    }
}

impl<T: Display> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Choice::All => serializer.serialize_str("All"),
            Choice::Only(value) => serializer.serialize_str(&value.to_string()),
        }
    }
}

impl<'de, T> Deserialize<'de> for Choice<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
            Null(()),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Choice::parse(&text).map_err(de::Error::custom),
            Raw::Number(n) => n
                .to_string()
                .parse()
                .map(Choice::Only)
                .map_err(de::Error::custom),
            Raw::Null(()) => Ok(Choice::All),
        }
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Criteria a record must satisfy; all supplied criteria are ANDed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub category: Choice<String>,
    pub property: Choice<PropertyId>,
    pub file_type: Choice<String>,
    pub status: Choice<String>,
    #[serde(rename = "type")]
    pub record_type: Choice<Flow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Criteria that match every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Choice::Only(category.into());
        self
    }

    pub fn property(mut self, property_id: PropertyId) -> Self {
        self.property = Choice::Only(property_id);
        self
    }

    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Choice::Only(file_type.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Choice::Only(status.into());
        self
    }

    pub fn record_type(mut self, flow: Flow) -> Self {
        self.record_type = Choice::Only(flow);
        self
    }

    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Narrow the date bounds to a time window resolved against `today`
    pub fn within(self, context: &TimeContext, today: NaiveDate) -> Self {
        let (from, to) = context.bounds_at(today);
        self.date_range(from, to)
    }

    /// True when no criterion restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.category.is_all()
            && self.property.is_all()
            && self.file_type.is_all()
            && self.status.is_all()
            && self.record_type.is_all()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Check a single record against every criterion
    pub fn matches(&self, record: &Record) -> bool {
        if let Choice::Only(ref category) = self.category {
            if !same_text(&record.category, category) {
                return false;
            }
        }

        if let Choice::Only(property_id) = self.property {
            if record.property_id != Some(property_id) {
                return false;
            }
        }

        if let Choice::Only(ref file_type) = self.file_type {
            match record.file_type.as_deref() {
                Some(ft) if same_text(ft, file_type) => {}
                _ => return false,
            }
        }

        if let Choice::Only(ref status) = self.status {
            match record.status.as_deref() {
                Some(s) if same_text(s, status) => {}
                _ => return false,
            }
        }

        if let Choice::Only(flow) = self.record_type {
            if record.flow != Some(flow) {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = record.date_naive() else {
                return false;
            };
            if self.date_from.map_or(false, |from| date < from) {
                return false;
            }
            if self.date_to.map_or(false, |to| date > to) {
                return false;
            }
        }

        true
    }

    /// Label/value pairs describing the active filters, for report headers
    pub fn summary(&self, properties: &PropertyDirectory) -> Vec<(String, String)> {
        let category = match &self.category {
            Choice::All => "All Categories".to_string(),
            Choice::Only(c) => c.clone(),
        };
        let property = match self.property {
            Choice::All => "All Properties".to_string(),
            Choice::Only(id) => properties.display_name(Some(id)),
        };
        let record_type = match self.record_type {
            Choice::All => "All Types".to_string(),
            Choice::Only(Flow::Income) => "Income".to_string(),
            Choice::Only(Flow::Expense) => "Expense".to_string(),
        };
        let dates = match (self.date_from, self.date_to) {
            (None, None) => "All Dates".to_string(),
            (Some(from), None) => format!("From {}", from),
            (None, Some(to)) => format!("Until {}", to),
            (Some(from), Some(to)) => format!("{} to {}", from, to),
        };

        let mut summary = vec![
            ("Category".to_string(), category),
            ("Property".to_string(), property),
            ("Type".to_string(), record_type),
            ("Date Range".to_string(), dates),
        ];
        if let Choice::Only(ref status) = self.status {
            summary.push(("Status".to_string(), status.clone()));
        }
        if let Choice::Only(ref file_type) = self.file_type {
            summary.push(("File Type".to_string(), file_type.clone()));
        }
        summary
    }

    /// One-line form of [`FilterCriteria::summary`]
    pub fn describe(&self, properties: &PropertyDirectory) -> String {
        self.summary(properties)
            .into_iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Return the groups with only the records that satisfy `criteria`.
///
/// Group count and order are preserved; a group may come back empty.
pub fn filter_records(groups: &[RecordGroup], criteria: &FilterCriteria) -> Vec<RecordGroup> {
    if criteria.is_unrestricted() {
        return groups.to_vec();
    }

    let filtered: Vec<RecordGroup> = groups
        .iter()
        .map(|group| {
            let records = group
                .records
                .iter()
                .filter(|r| criteria.matches(r))
                .cloned()
                .collect();
            group.with_same_shape(records)
        })
        .collect();

    log::debug!(
        "filter kept {} of {} records",
        crate::models::record_count(&filtered),
        crate::models::record_count(groups)
    );
    filtered
}

/// Case-insensitive substring search over name, description, category,
/// property name and tags.
///
/// A blank term returns the input unchanged. Groups with no matching record
/// are left out.
pub fn search_records(
    groups: &[RecordGroup],
    term: &str,
    properties: &PropertyDirectory,
) -> Vec<RecordGroup> {
    let term = term.trim();
    if term.is_empty() {
        return groups.to_vec();
    }
    let needle = term.to_lowercase();

    let results: Vec<RecordGroup> = groups
        .iter()
        .filter_map(|group| {
            let records: Vec<Record> = group
                .records
                .iter()
                .filter(|r| r.matches_term(&needle, properties))
                .cloned()
                .collect();
            (!records.is_empty()).then(|| group.with_same_shape(records))
        })
        .collect();

    log::debug!(
        "search '{}' matched {} records in {} groups",
        term,
        crate::models::record_count(&results),
        results.len()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{flatten, Property};
    use crate::types::Domain;
    use propdash_config::TimeRange;

    fn directory() -> PropertyDirectory {
        PropertyDirectory::new(vec![
            Property::new(1, "Marina Heights"),
            Property::new(2, "Palm Villas"),
        ])
    }

    fn groups() -> Vec<RecordGroup> {
        vec![
            RecordGroup::new("Leases").with_records(vec![
                Record::new("d1", Domain::Document, "Lease 4B", "Leases", "2024-01-10")
                    .with_property(1)
                    .with_file("pdf", 1024)
                    .with_tags(&["tenant", "signed"]),
                Record::new("d2", Domain::Document, "Lease 7A", "Leases", "2024-03-02")
                    .with_property(2)
                    .with_file("docx", 2048),
            ]),
            RecordGroup::new("Finance").with_records(vec![
                Record::new("t1", Domain::Transaction, "Rent March", "Rent", "2024-03-01")
                    .with_property(1)
                    .with_amount(8500.0)
                    .with_flow(Flow::Income)
                    .with_status("completed"),
                Record::new("t2", Domain::Transaction, "Plumbing repair", "Maintenance", "2024-03-15")
                    .with_property(2)
                    .with_amount(650.0)
                    .with_flow(Flow::Expense)
                    .with_description("Kitchen sink leak"),
                Record::new("t3", Domain::Transaction, "Bad date", "Rent", "someday")
                    .with_property(1)
                    .with_amount(100.0)
                    .with_flow(Flow::Income),
            ]),
            RecordGroup::new("Empty"),
        ]
    }

    fn ids(groups: &[RecordGroup]) -> Vec<String> {
        flatten(groups).map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_sentinels_are_identity() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "category": "All Categories",
            "property": "All Properties",
            "fileType": "All Types",
            "status": "All Statuses"
        }))
        .unwrap();
        assert!(criteria.is_unrestricted());
        assert_eq!(filter_records(&groups(), &criteria), groups());
    }

    #[test]
    fn test_filter_is_logical_and() {
        let criteria = FilterCriteria::new().property(1).record_type(Flow::Income);
        assert_eq!(ids(&filter_records(&groups(), &criteria)), vec!["t1", "t3"]);

        let criteria = criteria.category("rent").status("Completed");
        assert_eq!(ids(&filter_records(&groups(), &criteria)), vec!["t1"]);
    }

    #[test]
    fn test_filter_keeps_group_shape() {
        let criteria = FilterCriteria::new().category("Maintenance");
        let filtered = filter_records(&groups(), &criteria);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].name, "Leases");
        assert!(filtered[0].is_empty());
        assert_eq!(filtered[1].len(), 1);
    }

    #[test]
    fn test_missing_field_is_no_match() {
        // Transactions have no file type; documents have no status
        let by_type = filter_records(&groups(), &FilterCriteria::new().file_type("PDF"));
        assert_eq!(ids(&by_type), vec!["d1"]);

        let by_status = filter_records(&groups(), &FilterCriteria::new().status("completed"));
        assert_eq!(ids(&by_status), vec!["t1"]);
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 1);
        let to = NaiveDate::from_ymd_opt(2024, 3, 2);
        let filtered = filter_records(&groups(), &FilterCriteria::new().date_range(from, to));
        assert_eq!(ids(&filtered), vec!["d2", "t1"]);
    }

    #[test]
    fn test_unparseable_date_only_excluded_by_date_bounds() {
        let all = filter_records(&groups(), &FilterCriteria::new().category("Rent"));
        assert!(ids(&all).contains(&"t3".to_string()));

        let bounded = FilterCriteria::new()
            .category("Rent")
            .date_range(NaiveDate::from_ymd_opt(2000, 1, 1), None);
        assert!(!ids(&filter_records(&groups(), &bounded)).contains(&"t3".to_string()));
    }

    #[test]
    fn test_within_time_context() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let criteria = FilterCriteria::new().within(&TimeContext::new(TimeRange::Month), today);
        assert_eq!(ids(&filter_records(&groups(), &criteria)), vec!["d2", "t1", "t2"]);
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter_records(&[], &FilterCriteria::new().category("Rent")).is_empty());
        assert!(search_records(&[], "rent", &directory()).is_empty());
    }

    #[test]
    fn test_filter_is_pure() {
        let input = groups();
        let criteria = FilterCriteria::new().property(2);
        let first = filter_records(&input, &criteria);
        let second = filter_records(&input, &criteria);
        assert_eq!(first, second);
        assert_eq!(input, groups());
    }

    #[test]
    fn test_search_blank_term_is_identity() {
        assert_eq!(search_records(&groups(), "", &directory()), groups());
        assert_eq!(search_records(&groups(), "   ", &directory()), groups());
    }

    #[test]
    fn test_search_matches_every_field() {
        let dir = directory();
        assert_eq!(ids(&search_records(&groups(), "LEASE", &dir)), vec!["d1", "d2"]);
        assert_eq!(ids(&search_records(&groups(), "sink", &dir)), vec!["t2"]);
        assert_eq!(ids(&search_records(&groups(), "maintenance", &dir)), vec!["t2"]);
        assert_eq!(ids(&search_records(&groups(), "palm", &dir)), vec!["d2", "t2"]);
        assert_eq!(ids(&search_records(&groups(), "signed", &dir)), vec!["d1"]);
    }

    #[test]
    fn test_search_results_contain_term_and_nothing_else() {
        let dir = directory();
        let input = groups();
        for term in ["rent", "a", "heights", "zzz"] {
            let found = search_records(&input, term, &dir);
            let found_ids = ids(&found);
            for record in flatten(&input) {
                let hit = record.matches_term(&term.to_lowercase(), &dir);
                assert_eq!(hit, found_ids.contains(&record.id().to_string()), "term {term}");
            }
            assert!(found.iter().all(|g| !g.is_empty()));
        }
    }

    #[test]
    fn test_choice_parse_and_serde() {
        assert_eq!(Choice::<String>::parse("All Categories").unwrap(), Choice::All);
        assert_eq!(Choice::<String>::parse("").unwrap(), Choice::All);
        assert_eq!(
            Choice::<String>::parse("Leases").unwrap(),
            Choice::Only("Leases".to_string())
        );
        assert!(Choice::<Flow>::parse("transfer").is_err());

        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "property": 2,
            "type": "expense",
            "dateFrom": "2024-03-01",
            "category": null
        }))
        .unwrap();
        assert_eq!(criteria.property, Choice::Only(2));
        assert_eq!(criteria.record_type, Choice::Only(Flow::Expense));
        assert_eq!(criteria.date_from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(criteria.category.is_all());

        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["property"], "2");
        assert_eq!(json["category"], "All");
    }

    #[test]
    fn test_summary_uses_property_names() {
        let criteria = FilterCriteria::new().property(1).date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 3, 31),
        );
        let described = criteria.describe(&directory());
        assert!(described.contains("Property: Marina Heights"));
        assert!(described.contains("Category: All Categories"));
        assert!(described.contains("Date Range: 2024-01-01 to 2024-03-31"));
    }
}
