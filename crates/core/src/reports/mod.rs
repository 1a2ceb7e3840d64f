//! Transaction reports.
//!
//! Pure logic behind the reporting endpoints:
//! - Report windows (day, month, date range, trailing days)
//! - Search filters over transactions
//! - Dashboard totals
//! - CSV export
//! - Balance reconciliation against the transaction log

pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod period;
pub mod reconciliation;

pub use dashboard::DashboardSummary;
pub use error::ReportError;
pub use export::{REPORT_FILE_NAME, ReportLine, transactions_csv};
pub use filter::{FilterCondition, FilterOperation, TimePredicate, TransactionFilter, parse_filters};
pub use period::ReportWindow;
pub use reconciliation::{CustomerReconciliation, StoreReconciliation};
