//! Core data models for the dashboard

use chrono::NaiveDate;
use propdash_utils::parse_iso_date;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Domain, Flow, PaymentStatus};

/// Property identifier; the only key records use to reference a property
pub type PropertyId = u32;

/// A single domain data item: document, transaction, payment, expense or review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: String,
    /// Which collection the record belongs to
    pub domain: Domain,
    /// Title or headline
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Domain-specific category label
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    /// Primary date (YYYY-MM-DD): upload, transaction, payment or creation date
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Income or expense, transactions only
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub flow: Option<Flow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// File size in bytes, documents only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 1 to 5 stars, reviews only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub download_count: u32,
}

impl Record {
    /// Create a record with the required fields; everything else starts empty
    pub fn new(
        id: impl Into<String>,
        domain: Domain,
        name: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            domain,
            name: name.into(),
            description: None,
            category: category.into(),
            property_id: None,
            date: date.into(),
            due_date: None,
            amount: None,
            status: None,
            flow: None,
            file_type: None,
            size: None,
            tags: vec![],
            rating: None,
            uploaded_by: None,
            download_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn with_file(mut self, file_type: impl Into<String>, size: u64) -> Self {
        self.file_type = Some(file_type.into());
        self.size = Some(size);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_uploaded_by(mut self, uploaded_by: impl Into<String>) -> Self {
        self.uploaded_by = Some(uploaded_by.into());
        self
    }

    /// Record identifier, fixed at creation
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Primary date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    /// Due date as NaiveDate
    pub fn due_date_naive(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_iso_date)
    }

    pub fn is_income(&self) -> bool {
        self.flow == Some(Flow::Income)
    }

    pub fn is_expense(&self) -> bool {
        self.flow == Some(Flow::Expense)
    }

    /// Parsed payment status, if the status is one of paid/pending/overdue
    pub fn payment_status(&self) -> Option<PaymentStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Amount, or zero when absent
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Case-insensitive substring match over name, description, category,
    /// property name and tags. `term` must already be lower-case.
    pub fn matches_term(&self, term: &str, properties: &PropertyDirectory) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(term);

        contains(&self.name)
            || self.description.as_deref().map_or(false, contains)
            || contains(&self.category)
            || properties.name_of(self.property_id).map_or(false, contains)
            || self.tags.iter().any(|tag| contains(tag))
    }
}

/// A named list of records, the unit filter and search operate on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl RecordGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_id: None,
            records: vec![],
        }
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of this group holding only the given records
    pub(crate) fn with_same_shape(&self, records: Vec<Record>) -> Self {
        Self {
            name: self.name.clone(),
            property_id: self.property_id,
            records,
        }
    }
}

/// Iterate over every record of every group, in group order
pub fn flatten(groups: &[RecordGroup]) -> impl Iterator<Item = &Record> + Clone {
    groups.iter().flat_map(|g| g.records.iter())
}

/// Total number of records across groups
pub fn record_count(groups: &[RecordGroup]) -> usize {
    groups.iter().map(RecordGroup::len).sum()
}

/// Property information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
}

impl Property {
    pub fn new(id: PropertyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            units: None,
        }
    }
}

/// Lookup from property id to property details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDirectory {
    properties: BTreeMap<PropertyId, Property>,
}

impl PropertyDirectory {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: properties.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(&id)
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.properties.contains_key(&id)
    }

    /// Display name for an optional property reference
    pub fn name_of(&self, id: Option<PropertyId>) -> Option<&str> {
        id.and_then(|id| self.properties.get(&id)).map(|p| p.name.as_str())
    }

    /// Name for tables and exports; never empty
    pub fn display_name(&self, id: Option<PropertyId>) -> String {
        match id {
            None => "Unassigned".to_string(),
            Some(id) => self
                .name_of(Some(id))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Property #{}", id)),
        }
    }

    /// Resolve a user-supplied property reference: numeric id or name
    pub fn resolve(&self, reference: &str) -> Option<PropertyId> {
        let reference = reference.trim();
        if let Ok(id) = reference.parse::<PropertyId>() {
            return self.contains(id).then_some(id);
        }
        self.properties
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(reference))
            .map(|p| p.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Property> {
        self.properties.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> PropertyDirectory {
        PropertyDirectory::new(vec![
            Property::new(1, "Marina Heights"),
            Property::new(2, "Palm Villas"),
        ])
    }

    #[test]
    fn test_record_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": "txn-1",
            "domain": "transaction",
            "name": "Rent January",
            "category": "Rent",
            "propertyId": 1,
            "date": "2024-01-05",
            "amount": 8500.0,
            "type": "income"
        });
        let record: Record = serde_json::from_value(json).unwrap();
        assert_eq!(record.id(), "txn-1");
        assert_eq!(record.property_id, Some(1));
        assert!(record.is_income());
        assert!(record.tags.is_empty());
        assert_eq!(record.download_count, 0);
    }

    #[test]
    fn test_record_dates() {
        let record = Record::new("p-1", Domain::Payment, "Rent", "Rent", "2024-02-01")
            .with_due_date("2024-02-05");
        assert_eq!(record.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(record.due_date_naive(), NaiveDate::from_ymd_opt(2024, 2, 5));

        let bad = Record::new("p-2", Domain::Payment, "Rent", "Rent", "soon");
        assert_eq!(bad.date_naive(), None);
    }

    #[test]
    fn test_matches_term_fields() {
        let dir = directory();
        let record = Record::new("d-1", Domain::Document, "Lease Agreement", "Leases", "2024-01-01")
            .with_description("Signed by tenant")
            .with_property(2)
            .with_tags(&["Unit-4B"]);

        assert!(record.matches_term("lease", &dir));
        assert!(record.matches_term("signed", &dir));
        assert!(record.matches_term("palm", &dir));
        assert!(record.matches_term("unit-4b", &dir));
        assert!(!record.matches_term("marina", &dir));
    }

    #[test]
    fn test_matches_term_missing_optional_fields() {
        let record = Record::new("d-2", Domain::Document, "Invoice", "Receipts", "2024-01-01");
        assert!(!record.matches_term("tenant", &PropertyDirectory::default()));
    }

    #[test]
    fn test_directory_lookup() {
        let dir = directory();
        assert_eq!(dir.name_of(Some(1)), Some("Marina Heights"));
        assert_eq!(dir.display_name(None), "Unassigned");
        assert_eq!(dir.display_name(Some(9)), "Property #9");
        assert_eq!(dir.resolve("palm villas"), Some(2));
        assert_eq!(dir.resolve("1"), Some(1));
        assert_eq!(dir.resolve("42"), None);
    }

    #[test]
    fn test_flatten_keeps_group_order() {
        let groups = vec![
            RecordGroup::new("a").with_records(vec![
                Record::new("1", Domain::Expense, "x", "c", "2024-01-01"),
                Record::new("2", Domain::Expense, "y", "c", "2024-01-01"),
            ]),
            RecordGroup::new("b").with_records(vec![Record::new("3", Domain::Expense, "z", "c", "2024-01-01")]),
        ];
        let ids: Vec<&str> = flatten(&groups).map(Record::id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(record_count(&groups), 3);
    }
}
