//! Built-in demo dataset used when no fixture files are configured

use propdash_core::{Domain, Flow, Property, Record, RecordGroup};

use crate::dataset::Dataset;

fn property(id: u32, name: &str, address: &str, units: u32) -> Property {
    Property {
        address: Some(address.to_string()),
        units: Some(units),
        ..Property::new(id, name)
    }
}

fn documents() -> Vec<Record> {
    vec![
        Record::new("doc-1", Domain::Document, "Lease Agreement - Unit 4B", "Leases", "2024-01-15")
            .with_description("Two-year residential lease")
            .with_property(1)
            .with_file("pdf", 245_760)
            .with_tags(&["lease", "signed", "2024"])
            .with_uploaded_by("Sara Haddad"),
        Record::new("doc-2", Domain::Document, "Fire Safety Inspection", "Inspections", "2024-02-03")
            .with_property(2)
            .with_file("pdf", 1_048_576)
            .with_tags(&["civil defence", "annual"])
            .with_uploaded_by("Omar Khalil"),
        Record::new("doc-3", Domain::Document, "AC Service Receipt", "Receipts", "2024-02-20")
            .with_property(1)
            .with_file("jpg", 312_320)
            .with_tags(&["maintenance", "hvac"]),
        Record::new("doc-4", Domain::Document, "Title Deed", "Legal", "2023-11-08")
            .with_description("Scanned original deed")
            .with_property(3)
            .with_file("pdf", 2_097_152)
            .with_tags(&["ownership"])
            .with_uploaded_by("Sara Haddad"),
        Record::new("doc-5", Domain::Document, "Q1 Budget", "Financial", "2024-03-28")
            .with_file("xlsx", 51_200)
            .with_tags(&["budget", "q1"]),
    ]
}

fn transactions() -> Vec<Record> {
    vec![
        Record::new("txn-1", Domain::Transaction, "January rent - Unit 4B", "Rent", "2024-01-01")
            .with_property(1)
            .with_amount(9_500.0)
            .with_flow(Flow::Income)
            .with_status("completed"),
        Record::new("txn-2", Domain::Transaction, "January rent - Villa 12", "Rent", "2024-01-03")
            .with_property(2)
            .with_amount(14_000.0)
            .with_flow(Flow::Income)
            .with_status("completed"),
        Record::new("txn-3", Domain::Transaction, "Chiller repair", "Maintenance", "2024-01-18")
            .with_description("Replaced compressor relay")
            .with_property(2)
            .with_amount(2_350.0)
            .with_flow(Flow::Expense)
            .with_status("completed"),
        Record::new("txn-4", Domain::Transaction, "Service charges H1", "Service Charges", "2024-02-01")
            .with_property(3)
            .with_amount(6_800.0)
            .with_flow(Flow::Expense)
            .with_status("completed"),
        Record::new("txn-5", Domain::Transaction, "Parking bay rental", "Other Income", "2024-02-10")
            .with_property(3)
            .with_amount(750.0)
            .with_flow(Flow::Income)
            .with_status("completed"),
        Record::new("txn-6", Domain::Transaction, "February rent - Unit 4B", "Rent", "2024-02-01")
            .with_property(1)
            .with_amount(9_500.0)
            .with_flow(Flow::Income)
            .with_status("pending"),
        Record::new("txn-7", Domain::Transaction, "Building insurance", "Insurance", "2024-03-05")
            .with_amount(4_200.0)
            .with_flow(Flow::Expense)
            .with_status("completed"),
    ]
}

fn payments() -> Vec<Record> {
    vec![
        Record::new("pay-1", Domain::Payment, "Rent - Ahmed Al Mansoori", "Rent", "2024-03-01")
            .with_property(1)
            .with_due_date("2024-03-01")
            .with_amount(9_500.0)
            .with_status("paid"),
        Record::new("pay-2", Domain::Payment, "Rent - Priya Nair", "Rent", "2024-03-03")
            .with_property(2)
            .with_due_date("2024-03-05")
            .with_amount(14_000.0)
            .with_status("paid"),
        Record::new("pay-3", Domain::Payment, "Rent - Daniel Brooks", "Rent", "2024-03-10")
            .with_property(3)
            .with_due_date("2024-03-10")
            .with_amount(7_250.0)
            .with_status("pending"),
        Record::new("pay-4", Domain::Payment, "Security deposit - Li Wei", "Deposit", "2024-02-15")
            .with_property(3)
            .with_due_date("2024-02-15")
            .with_amount(5_000.0)
            .with_status("overdue"),
    ]
}

fn expenses() -> Vec<Record> {
    vec![
        Record::new("exp-1", Domain::Expense, "Pool cleaning", "Maintenance", "2024-03-02")
            .with_property(2)
            .with_amount(850.0)
            .with_status("paid"),
        Record::new("exp-2", Domain::Expense, "DEWA - March", "Utilities", "2024-03-12")
            .with_property(1)
            .with_amount(1_120.5)
            .with_status("pending"),
        Record::new("exp-3", Domain::Expense, "Agent commission", "Fees", "2024-01-20")
            .with_property(3)
            .with_amount(3_625.0)
            .with_status("paid"),
        Record::new("exp-4", Domain::Expense, "Repainting lobby", "Maintenance", "2024-02-27")
            .with_property(1)
            .with_amount(2_400.0)
            .with_status("paid"),
    ]
}

fn reviews() -> Vec<Record> {
    vec![
        Record::new("rev-1", Domain::Review, "Quick maintenance response", "Tenant", "2024-02-11")
            .with_property(1)
            .with_rating(5),
        Record::new("rev-2", Domain::Review, "Parking is tight", "Tenant", "2024-02-25")
            .with_property(3)
            .with_rating(3),
        Record::new("rev-3", Domain::Review, "Great community pool", "Tenant", "2024-03-07")
            .with_property(2)
            .with_rating(4),
    ]
}

/// Small, consistent dataset covering every record domain
pub fn demo_dataset() -> Dataset {
    Dataset {
        properties: vec![
            property(1, "Marina Heights", "Dubai Marina, Tower B", 48),
            property(2, "Palm Villas", "Palm Jumeirah, Frond C", 12),
            property(3, "Downtown Lofts", "Downtown Dubai, Boulevard", 30),
        ],
        groups: vec![
            RecordGroup::new("Documents").with_records(documents()),
            RecordGroup::new("Transactions").with_records(transactions()),
            RecordGroup::new("Payments").with_records(payments()),
            RecordGroup::new("Expenses").with_records(expenses()),
            RecordGroup::new("Reviews").with_records(reviews()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_dataset;
    use propdash_core::compute_stats;

    #[test]
    fn test_demo_dataset_is_clean() {
        let dataset = demo_dataset();
        let issues = validate_dataset(&dataset);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(dataset.record_count(), 23);
    }

    #[test]
    fn test_demo_dataset_stats() {
        let store = demo_dataset().into_store().unwrap();
        let stats = compute_stats(store.records());
        assert_eq!(stats.storage.total_files, 5);
        assert_eq!(stats.payments.total_expected, 35_750.0);
        assert_eq!(stats.payments.collection_rate, 66.0);
        assert_eq!(stats.transactions.total_income, 33_750.0);
        assert_eq!(stats.transactions.total_expenses, 13_350.0);
        assert_eq!(stats.reviews.total_reviews, 3);
    }
}
