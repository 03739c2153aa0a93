//! Aggregator: summary statistics for dashboard cards and report exports
//!
//! Every function takes any iterator of records and only looks at records
//! of its own domain. Empty input produces zeroed results. Ratios go
//! through [`percentage`], which returns 0 for a zero denominator.

use propdash_utils::round_half_up;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::Record;
use crate::types::{Domain, Flow, PaymentStatus};

/// `part / whole * 100`, or 0 when `whole` is zero
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let value = part / whole * 100.0;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `total / count`, or 0 for an empty set
fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Count and byte size of a group of documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeBucket {
    pub count: usize,
    pub size: u64,
}

/// Document storage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_size: u64,
    pub total_files: usize,
    pub average_file_size: f64,
    pub category_stats: BTreeMap<String, SizeBucket>,
    /// Keyed by lower-cased file type; documents without one are not bucketed
    pub type_stats: BTreeMap<String, SizeBucket>,
}

pub fn storage_stats<'a>(records: impl IntoIterator<Item = &'a Record>) -> StorageStats {
    let mut stats = StorageStats::default();

    for record in records.into_iter().filter(|r| r.domain == Domain::Document) {
        let size = record.size.unwrap_or(0);
        stats.total_files += 1;
        stats.total_size += size;

        let bucket = stats.category_stats.entry(record.category.clone()).or_default();
        bucket.count += 1;
        bucket.size += size;

        if let Some(ref file_type) = record.file_type {
            let bucket = stats.type_stats.entry(file_type.to_lowercase()).or_default();
            bucket.count += 1;
            bucket.size += size;
        }
    }

    stats.average_file_size = average(stats.total_size as f64, stats.total_files);
    stats
}

/// Rent collection statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_collected: f64,
    pub total_pending: f64,
    pub total_overdue: f64,
    /// Sum over every payment, whatever its status
    pub total_expected: f64,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    /// Collected share of expected, rounded half up to a whole percent
    pub collection_rate: f64,
}

pub fn payment_stats<'a>(records: impl IntoIterator<Item = &'a Record>) -> PaymentStats {
    let mut stats = PaymentStats::default();

    for record in records.into_iter().filter(|r| r.domain == Domain::Payment) {
        let amount = record.amount_or_zero();
        stats.total_expected += amount;
        match record.payment_status() {
            Some(PaymentStatus::Paid) => {
                stats.total_collected += amount;
                stats.paid_count += 1;
            }
            Some(PaymentStatus::Pending) => {
                stats.total_pending += amount;
                stats.pending_count += 1;
            }
            Some(PaymentStatus::Overdue) => {
                stats.total_overdue += amount;
                stats.overdue_count += 1;
            }
            None => {}
        }
    }

    stats.collection_rate = round_half_up(percentage(stats.total_collected, stats.total_expected), 0);
    stats
}

/// Count, amount and share of total for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountBucket {
    pub count: usize,
    pub amount: f64,
    pub percentage: f64,
}

/// Expense statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStats {
    pub total_expenses: f64,
    pub expense_count: usize,
    pub average_expense: f64,
    /// Amount of expenses still marked pending
    pub pending_amount: f64,
    pub category_stats: BTreeMap<String, AmountBucket>,
}

pub fn expense_stats<'a>(records: impl IntoIterator<Item = &'a Record>) -> ExpenseStats {
    let mut stats = ExpenseStats::default();

    for record in records.into_iter().filter(|r| r.domain == Domain::Expense) {
        let amount = record.amount_or_zero();
        stats.total_expenses += amount;
        stats.expense_count += 1;
        if record.payment_status() == Some(PaymentStatus::Pending) {
            stats.pending_amount += amount;
        }

        let bucket = stats.category_stats.entry(record.category.clone()).or_default();
        bucket.count += 1;
        bucket.amount += amount;
    }

    let total = stats.total_expenses;
    for bucket in stats.category_stats.values_mut() {
        bucket.percentage = percentage(bucket.amount, total);
    }
    stats.average_expense = average(total, stats.expense_count);
    stats
}

/// Income, expense and net for one transaction category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFlow {
    pub category: String,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub count: usize,
}

/// Income/expense summary shared by the dashboard and every report export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub transaction_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
    /// Net income as a share of income
    pub profit_margin: f64,
    /// In order of first appearance
    pub categories: Vec<CategoryFlow>,
}

pub fn transaction_summary<'a>(records: impl IntoIterator<Item = &'a Record>) -> TransactionSummary {
    let mut summary = TransactionSummary::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records.into_iter().filter(|r| r.domain == Domain::Transaction) {
        // Amounts may be stored signed; the flow decides the direction
        let amount = record.amount_or_zero().abs();
        summary.transaction_count += 1;

        let slot = *index.entry(record.category.clone()).or_insert_with(|| {
            summary.categories.push(CategoryFlow {
                category: record.category.clone(),
                ..CategoryFlow::default()
            });
            summary.categories.len() - 1
        });
        let category = &mut summary.categories[slot];
        category.count += 1;

        match record.flow {
            Some(Flow::Income) => {
                summary.total_income += amount;
                summary.income_count += 1;
                category.income += amount;
            }
            Some(Flow::Expense) => {
                summary.total_expenses += amount;
                summary.expense_count += 1;
                category.expense += amount;
            }
            None => {}
        }
        category.net = category.income - category.expense;
    }

    summary.net_income = summary.total_income - summary.total_expenses;
    summary.profit_margin = percentage(summary.net_income, summary.total_income);
    summary
}

/// Review statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub average_rating: f64,
    /// Index 0 holds one-star reviews, index 4 five-star reviews
    pub rating_distribution: [usize; 5],
}

pub fn review_stats<'a>(records: impl IntoIterator<Item = &'a Record>) -> ReviewStats {
    let mut stats = ReviewStats::default();
    let mut rating_total = 0u64;

    for record in records.into_iter().filter(|r| r.domain == Domain::Review) {
        if let Some(rating @ 1..=5) = record.rating {
            stats.total_reviews += 1;
            stats.rating_distribution[usize::from(rating) - 1] += 1;
            rating_total += u64::from(rating);
        }
    }

    stats.average_rating = average(rating_total as f64, stats.total_reviews);
    stats
}

/// Every dashboard statistic over one record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub storage: StorageStats,
    pub payments: PaymentStats,
    pub expenses: ExpenseStats,
    pub transactions: TransactionSummary,
    pub reviews: ReviewStats,
}

pub fn compute_stats<'a>(records: impl IntoIterator<Item = &'a Record>) -> DashboardStats {
    let records: Vec<&Record> = records.into_iter().collect();
    DashboardStats {
        storage: storage_stats(records.iter().copied()),
        payments: payment_stats(records.iter().copied()),
        expenses: expense_stats(records.iter().copied()),
        transactions: transaction_summary(records.iter().copied()),
        reviews: review_stats(records.iter().copied()),
    }
}
