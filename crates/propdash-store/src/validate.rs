//! Dataset validation
//!
//! Errors make a dataset unusable (duplicate ids, blank ids). Warnings flag
//! records the dashboard still handles: bad dates are skipped by date
//! filters, out-of-range ratings are left out of review statistics.

use once_cell::sync::Lazy;
use propdash_core::{Domain, PropertyId};
use propdash_utils::is_iso_date;
use regex::Regex;
use std::collections::HashSet;

use crate::dataset::Dataset;

static FILE_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub record_id: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    fn error(record_id: Option<&str>, message: String) -> Self {
        Self {
            level: IssueLevel::Error,
            record_id: record_id.map(str::to_string),
            message,
        }
    }

    fn warning(record_id: &str, message: String) -> Self {
        Self {
            level: IssueLevel::Warning,
            record_id: Some(record_id.to_string()),
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.record_id {
            Some(ref id) => write!(f, "{}: {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

pub fn validate_dataset(dataset: &Dataset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut property_ids: HashSet<PropertyId> = HashSet::new();
    for property in &dataset.properties {
        if !property_ids.insert(property.id) {
            issues.push(ValidationIssue::error(
                None,
                format!("duplicate property id {}", property.id),
            ));
        }
    }

    let mut record_ids: HashSet<&str> = HashSet::new();
    for group in &dataset.groups {
        for record in &group.records {
            let id = record.id();
            if id.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    None,
                    format!("record with blank id in group '{}'", group.name),
                ));
                continue;
            }
            if !record_ids.insert(id) {
                issues.push(ValidationIssue::error(Some(id), "duplicate record id".to_string()));
            }

            if !is_iso_date(&record.date) {
                issues.push(ValidationIssue::warning(id, format!("date '{}' is not YYYY-MM-DD", record.date)));
            }
            if let Some(ref due) = record.due_date {
                if !is_iso_date(due) {
                    issues.push(ValidationIssue::warning(id, format!("due date '{}' is not YYYY-MM-DD", due)));
                }
            }
            if let Some(property_id) = record.property_id {
                if !dataset.properties.is_empty() && !property_ids.contains(&property_id) {
                    issues.push(ValidationIssue::warning(id, format!("unknown property {}", property_id)));
                }
            }
            if let Some(ref file_type) = record.file_type {
                if !FILE_TYPE.is_match(file_type) {
                    issues.push(ValidationIssue::warning(id, format!("odd file type '{}'", file_type)));
                }
            }

            match record.domain {
                Domain::Transaction if record.flow.is_none() => {
                    issues.push(ValidationIssue::warning(id, "transaction has no type".to_string()));
                }
                Domain::Payment | Domain::Expense if record.amount.map_or(false, |a| a < 0.0) => {
                    issues.push(ValidationIssue::warning(id, "negative amount".to_string()));
                }
                Domain::Review if !matches!(record.rating, Some(1..=5)) => {
                    issues.push(ValidationIssue::warning(id, "rating must be 1 to 5".to_string()));
                }
                _ => {}
            }
        }
    }

    issues
}
