//! Fixture file shape

use propdash_core::{CoreResult, Property, RecordGroup, RecordStore};
use serde::{Deserialize, Serialize};

/// Properties plus grouped records, as stored in one fixture file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub groups: Vec<RecordGroup>,
}

impl Dataset {
    /// Append another file's groups after ours. Properties already known by
    /// id are kept; new ones are added.
    pub fn append(&mut self, other: Dataset) {
        for property in other.properties {
            if !self.properties.iter().any(|p| p.id == property.id) {
                self.properties.push(property);
            }
        }
        self.groups.extend(other.groups);
    }

    pub fn record_count(&self) -> usize {
        propdash_core::record_count(&self.groups)
    }

    /// Hand the dataset to an entity store
    pub fn into_store(self) -> CoreResult<RecordStore> {
        RecordStore::from_groups(self.properties, self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propdash_core::{Domain, Record};

    #[test]
    fn test_append_keeps_order_and_first_property() {
        let mut first = Dataset {
            properties: vec![Property::new(1, "Marina Heights")],
            groups: vec![RecordGroup::new("Documents")],
        };
        let second = Dataset {
            properties: vec![Property::new(1, "Renamed"), Property::new(2, "Palm Villas")],
            groups: vec![RecordGroup::new("Payments").with_records(vec![Record::new(
                "pay-1",
                Domain::Payment,
                "Rent",
                "Rent",
                "2024-01-01",
            )])],
        };
        first.append(second);

        assert_eq!(first.properties.len(), 2);
        assert_eq!(first.properties[0].name, "Marina Heights");
        let names: Vec<&str> = first.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Documents", "Payments"]);
        assert_eq!(first.record_count(), 1);
        assert_eq!(first.into_store().unwrap().len(), 1);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "properties": [{ "id": 3, "name": "Downtown Lofts", "units": 12 }],
            "groups": [{
                "name": "Transactions",
                "propertyId": 3,
                "records": [{
                    "id": "txn-1", "domain": "transaction", "name": "March rent",
                    "category": "Rent", "propertyId": 3, "date": "2024-03-01",
                    "amount": 9500, "type": "income", "downloadCount": 2
                }]
            }]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        let record = &dataset.groups[0].records[0];
        assert_eq!(record.id(), "txn-1");
        assert!(record.is_income());
        assert_eq!(record.download_count, 2);
        assert_eq!(dataset.groups[0].property_id, Some(3));
        assert_eq!(dataset.properties[0].units, Some(12));
    }
}
