//! Entity re-exports.

pub use super::admins::Entity as Admins;
pub use super::customers::Entity as Customers;
pub use super::store_admins::Entity as StoreAdmins;
pub use super::stores::Entity as Stores;
pub use super::transactions::Entity as Transactions;
