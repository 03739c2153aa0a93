//! In-memory entity store
//!
//! Holds one dataset for the lifetime of the process. Mutations are not
//! persisted; reloading fixtures discards them.

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::models::{flatten, Property, PropertyDirectory, Record, RecordGroup};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    properties: PropertyDirectory,
    groups: Vec<RecordGroup>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded groups, rejecting duplicate record ids
    pub fn from_groups(properties: Vec<Property>, groups: Vec<RecordGroup>) -> CoreResult<Self> {
        {
            let mut seen = HashSet::new();
            for record in flatten(&groups) {
                if !seen.insert(record.id()) {
                    return Err(CoreError::DuplicateEntry {
                        id: record.id().to_string(),
                    });
                }
            }
        }

        log::debug!(
            "Record store holds {} groups and {} properties",
            groups.len(),
            properties.len()
        );

        Ok(Self {
            properties: PropertyDirectory::new(properties),
            groups,
        })
    }

    pub fn groups(&self) -> &[RecordGroup] {
        &self.groups
    }

    /// Every record, in group order
    pub fn records(&self) -> impl Iterator<Item = &Record> + Clone {
        flatten(&self.groups)
    }

    pub fn properties(&self) -> &PropertyDirectory {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(RecordGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(RecordGroup::is_empty)
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records().find(|r| r.id() == id)
    }

    /// Append a record to the named group, creating the group when absent
    pub fn insert(&mut self, group_name: &str, record: Record) -> CoreResult<()> {
        if self.find(record.id()).is_some() {
            return Err(CoreError::DuplicateEntry {
                id: record.id().to_string(),
            });
        }

        match self.groups.iter_mut().find(|g| g.name == group_name) {
            Some(group) => group.records.push(record),
            None => self
                .groups
                .push(RecordGroup::new(group_name).with_records(vec![record])),
        }
        Ok(())
    }

    /// Remove a record from whichever group owns it
    pub fn remove(&mut self, id: &str) -> CoreResult<Record> {
        for group in &mut self.groups {
            if let Some(position) = group.records.iter().position(|r| r.id() == id) {
                return Ok(group.records.remove(position));
            }
        }
        Err(CoreError::RecordNotFound { id: id.to_string() })
    }

    /// Bump `downloadCount` on each listed record; unknown ids are skipped.
    /// Returns the number of records updated.
    pub fn record_downloads<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let wanted: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let mut updated = 0;
        for record in self.groups.iter_mut().flat_map(|g| g.records.iter_mut()) {
            if wanted.contains(record.id()) {
                record.download_count = record.download_count.saturating_add(1);
                updated += 1;
            }
        }
        updated
    }
}
