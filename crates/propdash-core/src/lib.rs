//! Core record model, filtering and statistics for the property dashboard
//!
//! Data flows one way: groups of records are narrowed by [`filter_records`]
//! and [`search_records`], then reduced by the functions in [`stats`].
//! Nothing here performs I/O.

pub mod error;
pub mod filter;
pub mod investment;
pub mod models;
pub mod stats;
pub mod store;
pub mod time;
pub mod types;

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger, ErrorSeverity};
pub use filter::{filter_records, search_records, Choice, FilterCriteria};
pub use investment::{investment_metrics, monthly_payment, InvestmentInputs, InvestmentMetrics};
pub use models::{flatten, record_count, Property, PropertyDirectory, PropertyId, Record, RecordGroup};
pub use stats::{
    compute_stats, expense_stats, payment_stats, percentage, review_stats, storage_stats, transaction_summary,
    AmountBucket, CategoryFlow, DashboardStats, ExpenseStats, PaymentStats, ReviewStats, SizeBucket, StorageStats,
    TransactionSummary,
};
pub use store::RecordStore;
pub use time::TimeContext;
pub use types::{Domain, Flow, PaymentStatus};
