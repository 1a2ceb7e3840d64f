//! Mapping from database errors to ledger errors.

use goldbook_core::ledger::LedgerError;
use sea_orm::{DbErr, SqlErr};

/// Converts a database error into a ledger error.
///
/// Unique and foreign key violations become `Conflict`; everything else is a
/// `Persistence` failure carrying the driver message.
#[must_use]
pub fn ledger_error(err: DbErr) -> LedgerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            LedgerError::Conflict(format!("duplicate value: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            LedgerError::Conflict(format!("referenced row is missing or still in use: {detail}"))
        }
        _ => LedgerError::Persistence(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldbook_core::ledger::ErrorKind;

    #[test]
    fn test_plain_errors_are_persistence_failures() {
        let err = ledger_error(DbErr::Custom("connection reset".to_string()));
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_record_not_found_is_persistence_failure() {
        let err = ledger_error(DbErr::RecordNotFound("customers".to_string()));
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }
}
