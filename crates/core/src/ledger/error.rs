//! Ledger error types.
//!
//! Every failure the poster or the ledger plumbing can report, grouped into
//! an [`ErrorKind`] that decides the HTTP status.

use goldbook_shared::AppError;
use goldbook_shared::types::{AdminId, CustomerId, StoreId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Broad category of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced record does not exist.
    NotFound,
    /// The request itself is invalid.
    Validation,
    /// The acting admin may not perform the operation.
    Forbidden,
    /// A uniqueness or referential constraint would be violated.
    Conflict,
    /// The storage layer failed; nothing was written.
    Persistence,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Not Found ==========
    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Store not found by name.
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Admin not found.
    #[error("Admin not found: {0}")]
    AdminNotFound(AdminId),

    // ========== Validation ==========
    /// Gold weight must be strictly positive.
    #[error("Gold weight must be positive, got {0}")]
    NonPositiveWeight(Decimal),

    /// Gold price must be strictly positive.
    #[error("Gold price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    /// A quantity carries more decimal places than allowed.
    #[error("{field} allows at most {max_scale} decimal places")]
    ExcessivePrecision {
        /// Offending field.
        field: &'static str,
        /// Allowed decimal places.
        max_scale: u32,
    },

    /// A quantity is at or above [`super::types::MAX_MAGNITUDE`].
    #[error("{field} must be less than 10^20")]
    ExcessiveMagnitude {
        /// Offending field.
        field: &'static str,
    },

    /// Weight times price, or a running total, reaches
    /// [`super::types::MAX_MAGNITUDE`].
    #[error("Transaction amount is too large")]
    AmountOverflow,

    /// Trade type outside `buy`/`sell`.
    #[error("Unknown transaction type: {0}")]
    UnknownTradeType(String),

    /// Payment method outside the closed set.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Description exceeds the maximum length.
    #[error("Description must be at most {0} characters")]
    DescriptionTooLong(usize),

    /// Generic input validation failure from the plumbing layer.
    #[error("{0}")]
    InvalidInput(String),

    // ========== Forbidden ==========
    /// Admin is not in the store's managing set.
    #[error("Admin {admin_id} does not manage store {store_id}")]
    NotStoreManager {
        /// The acting admin.
        admin_id: AdminId,
        /// The store that was targeted.
        store_id: StoreId,
    },

    /// Admin did not create the store.
    #[error("Admin {admin_id} did not create store {store_id}")]
    NotStoreOwner {
        /// The acting admin.
        admin_id: AdminId,
        /// The store that was targeted.
        store_id: StoreId,
    },

    // ========== Conflict ==========
    /// A uniqueness or referential constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    // ========== Persistence ==========
    /// Storage failure; the unit of work was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl LedgerError {
    /// Returns the broad category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CustomerNotFound(_)
            | Self::StoreNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::AdminNotFound(_) => ErrorKind::NotFound,

            Self::NonPositiveWeight(_)
            | Self::NonPositivePrice(_)
            | Self::ExcessivePrecision { .. }
            | Self::ExcessiveMagnitude { .. }
            | Self::AmountOverflow
            | Self::UnknownTradeType(_)
            | Self::UnknownPaymentMethod(_)
            | Self::DescriptionTooLong(_)
            | Self::InvalidInput(_) => ErrorKind::Validation,

            Self::NotStoreManager { .. } | Self::NotStoreOwner { .. } => ErrorKind::Forbidden,

            Self::Conflict(_) => ErrorKind::Conflict,

            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::StoreNotFound(_) => "STORE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AdminNotFound(_) => "ADMIN_NOT_FOUND",
            Self::NonPositiveWeight(_) => "NON_POSITIVE_WEIGHT",
            Self::NonPositivePrice(_) => "NON_POSITIVE_PRICE",
            Self::ExcessivePrecision { .. } => "EXCESSIVE_PRECISION",
            Self::ExcessiveMagnitude { .. } => "EXCESSIVE_MAGNITUDE",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::UnknownTradeType(_) => "UNKNOWN_TRANSACTION_TYPE",
            Self::UnknownPaymentMethod(_) => "UNKNOWN_PAYMENT_METHOD",
            Self::DescriptionTooLong(_) => "DESCRIPTION_TOO_LONG",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotStoreManager { .. } => "NOT_STORE_MANAGER",
            Self::NotStoreOwner { .. } => "NOT_STORE_OWNER",
            Self::Conflict(_) => "CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::Conflict => 409,
            ErrorKind::Persistence => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::Forbidden => Self::Forbidden(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Persistence => Self::Database(message),
        }
    }
}
