//! Report error types.

use chrono::NaiveDate;
use goldbook_shared::AppError;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// A date that cannot be represented or parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Month outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Dashboard window must span at least one day.
    #[error("Duration must be at least 1 day, got {0}")]
    InvalidDuration(i64),

    /// A search filter that cannot be applied.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Writing the export failed.
    #[error("Failed to export report: {0}")]
    Export(String),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Export(_) => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
