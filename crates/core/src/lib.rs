//! Core business logic for Goldbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the port traits in [`ledger::ports`].
//!
//! # Modules
//!
//! - `ledger` - Gold trade entities, balance rules and the transaction poster
//! - `reports` - Dashboard totals, transaction filters and CSV export
//! - `auth` - Password hashing for admins

pub mod auth;
pub mod ledger;
pub mod reports;
