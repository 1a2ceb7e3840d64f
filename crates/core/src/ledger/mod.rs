//! Gold trade ledger.
//!
//! This module implements the transaction-posting engine:
//! - Domain types for customers, stores, trades and transactions
//! - The store management check
//! - Balance update rules and history replay
//! - Storage ports and the transaction poster
//! - Error types for ledger operations

pub mod authorization;
pub mod balance;
pub mod error;
pub mod ports;
pub mod poster;
pub mod types;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
pub(crate) mod memory;
#[cfg(test)]
mod poster_props;

pub use authorization::{can_manage, ensure_can_manage, ensure_owner, is_owner};
pub use balance::{BalanceUpdate, apply_trade, replay_customer, replay_store};
pub use error::{ErrorKind, LedgerError};
pub use ports::{CustomerStore, StoreStore, TransactionLog, UnitOfWork, UnitOfWorkProvider};
pub use poster::{PERSISTENCE_FAILURE_MESSAGE, PostingStage, TransactionPoster, validate_input};
pub use types::{
    Admin, Customer, CustomerBalance, MAX_DESCRIPTION_LEN, MAX_INPUT_SCALE, NewTransaction,
    PaymentMethod, PostTransactionInput, Store, StoreBalance, Trade, TradeType, Transaction,
};
