//! Repository implementations for database operations.

pub mod admin;
pub mod customer;
pub mod store;
pub mod transaction;

pub use admin::{AdminCredentials, AdminRepository};
pub use customer::{CustomerProfile, CustomerRepository};
pub use store::StoreRepository;
pub use transaction::{TransactionRepository, filter_condition};
