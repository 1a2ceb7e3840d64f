//! `SeaORM` entities for the gold ledger schema.

pub mod prelude;

pub mod admins;
pub mod customers;
pub mod sea_orm_active_enums;
pub mod store_admins;
pub mod stores;
pub mod transactions;
