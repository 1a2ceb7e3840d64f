//! Goldbook schema migrations.
//!
//! The initial migration creates the admin, customer, store and transaction
//! ledgers together with the store management join table. Run them with the
//! `migrator` binary or [`Migrator::up`].

pub use sea_orm_migration::prelude::*;

mod m20260108_000001_initial;

/// Applies the Goldbook schema in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260108_000001_initial::Migration)]
    }
}
