//! Storage ports used by the transaction poster.
//!
//! The db crate implements these over a database transaction. Every method
//! runs inside the unit of work that produced it, so nothing becomes visible
//! to other readers before [`UnitOfWork::commit`].

use async_trait::async_trait;
use goldbook_shared::types::CustomerId;

use super::error::LedgerError;
use super::types::{Customer, NewTransaction, Store, Transaction};

/// Customer rows.
#[async_trait]
pub trait CustomerStore: Send {
    /// Loads a customer, locking the row until the unit of work ends.
    async fn customer_by_id(&mut self, id: CustomerId) -> Result<Option<Customer>, LedgerError>;

    /// Writes the customer's balance mirror.
    async fn save_customer(&mut self, customer: &Customer) -> Result<(), LedgerError>;
}

/// Store rows.
#[async_trait]
pub trait StoreStore: Send {
    /// Loads a store with its managing admins, locking the row until the unit
    /// of work ends.
    async fn store_by_name(&mut self, name: &str) -> Result<Option<Store>, LedgerError>;

    /// Writes the store's balance mirror, keyed by `store.id`.
    async fn save_store(&mut self, store: &Store) -> Result<(), LedgerError>;
}

/// The append-only transaction log.
#[async_trait]
pub trait TransactionLog: Send {
    /// Appends a transaction and returns it as recorded.
    async fn insert_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction, LedgerError>;
}

/// One atomic group of ledger writes.
///
/// Dropping a unit without calling either method must also discard its
/// writes.
#[async_trait]
pub trait UnitOfWork: CustomerStore + StoreStore + TransactionLog + Sized {
    /// Makes every write in the unit visible.
    async fn commit(self) -> Result<(), LedgerError>;

    /// Discards every write in the unit.
    async fn rollback(self) -> Result<(), LedgerError>;
}

/// Opens units of work.
#[async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    /// Unit of work type handed out by [`Self::begin`].
    type Unit: UnitOfWork;

    /// Starts a new unit of work.
    async fn begin(&self) -> Result<Self::Unit, LedgerError>;
}
