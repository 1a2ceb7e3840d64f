//! Balance reconciliation.
//!
//! Customer and store balances are mirrors mutated by posting. Replaying the
//! transaction log through the same rules shows whether a mirror has drifted.

use goldbook_shared::types::{CustomerId, StoreId};
use serde::Serialize;

use crate::ledger::{
    Customer, CustomerBalance, LedgerError, Store, StoreBalance, Transaction, replay_customer,
    replay_store,
};

/// A customer's stored balance next to the one replayed from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerReconciliation {
    /// Customer ID.
    pub customer_id: CustomerId,
    /// Balance as stored on the customer.
    pub stored: CustomerBalance,
    /// Balance rebuilt from the customer's transactions.
    pub replayed: CustomerBalance,
    /// Number of transactions replayed.
    pub transaction_count: usize,
    /// True when both balances agree.
    pub consistent: bool,
}

impl CustomerReconciliation {
    /// Replays `history`, which must be every transaction of the customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmountOverflow` if replay overflows.
    pub fn new(customer: &Customer, history: &[Transaction]) -> Result<Self, LedgerError> {
        let replayed = replay_customer(history)?;
        Ok(Self {
            customer_id: customer.id,
            stored: customer.balance,
            replayed,
            transaction_count: history.len(),
            consistent: replayed == customer.balance,
        })
    }
}

/// A store's stored balance next to the one replayed from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReconciliation {
    /// Store ID.
    pub store_id: StoreId,
    /// Balance as stored on the store.
    pub stored: StoreBalance,
    /// Balance rebuilt from the store's transactions.
    pub replayed: StoreBalance,
    /// Number of transactions replayed.
    pub transaction_count: usize,
    /// True when both balances agree.
    pub consistent: bool,
}

impl StoreReconciliation {
    /// Replays `history`, which must be every transaction posted against the store.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmountOverflow` if replay overflows.
    pub fn new(store: &Store, history: &[Transaction]) -> Result<Self, LedgerError> {
        let replayed = replay_store(store.balance.total_amount, history)?;
        Ok(Self {
            store_id: store.id,
            stored: store.balance,
            replayed,
            transaction_count: history.len(),
            consistent: replayed == store.balance,
        })
    }
}
