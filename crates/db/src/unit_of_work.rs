//! Ledger unit of work over a database transaction.
//!
//! Customer and store rows are read with `SELECT ... FOR UPDATE`, so two
//! posts touching the same customer or store serialize on the row locks.
//! The poster locks the store before the customer.

use async_trait::async_trait;
use chrono::Utc;
use goldbook_core::ledger::{
    Customer, CustomerStore, LedgerError, NewTransaction, Store, StoreStore, Transaction,
    TransactionLog, UnitOfWork, UnitOfWorkProvider,
};
use goldbook_shared::types::{AdminId, CustomerId, StoreId};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{customers, store_admins, stores, transactions};
use crate::error::ledger_error;

/// Opens ledger units of work on a connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmLedger {
    db: DatabaseConnection,
}

impl SeaOrmLedger {
    /// Creates a new provider.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkProvider for SeaOrmLedger {
    type Unit = SeaOrmUnitOfWork;

    async fn begin(&self) -> Result<SeaOrmUnitOfWork, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_error)?;
        Ok(SeaOrmUnitOfWork { txn })
    }
}

/// A unit of work backed by one database transaction.
///
/// Dropping it without committing rolls the transaction back.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

/// Loads the admins managing a store.
pub(crate) async fn store_managers<C: ConnectionTrait>(
    db: &C,
    store_id: StoreId,
) -> Result<Vec<AdminId>, LedgerError> {
    let rows = store_admins::Entity::find()
        .filter(store_admins::Column::StoreId.eq(store_id.into_inner()))
        .order_by_asc(store_admins::Column::CreatedAt)
        .all(db)
        .await
        .map_err(ledger_error)?;
    Ok(rows.into_iter().map(|row| AdminId::from(row.admin_id)).collect())
}

#[async_trait]
impl CustomerStore for SeaOrmUnitOfWork {
    async fn customer_by_id(&mut self, id: CustomerId) -> Result<Option<Customer>, LedgerError> {
        let model = customers::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(ledger_error)?;
        Ok(model.map(Customer::from))
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), LedgerError> {
        let balance = customer.balance;
        customers::ActiveModel {
            id: ActiveValue::Unchanged(customer.id.into_inner()),
            borrowed_gold: Set(balance.borrowed_gold),
            total_bought: Set(balance.total_bought),
            total_sold: Set(balance.total_sold),
            borrowed_amount: Set(balance.borrowed_amount),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(ledger_error)?;
        Ok(())
    }
}

#[async_trait]
impl StoreStore for SeaOrmUnitOfWork {
    async fn store_by_name(&mut self, name: &str) -> Result<Option<Store>, LedgerError> {
        let Some(model) = stores::Entity::find()
            .filter(stores::Column::Name.eq(name))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(ledger_error)?
        else {
            return Ok(None);
        };

        let managers = store_managers(&self.txn, model.id.into()).await?;
        Ok(Some(model.into_store(managers)))
    }

    async fn save_store(&mut self, store: &Store) -> Result<(), LedgerError> {
        let balance = store.balance;
        stores::ActiveModel {
            id: ActiveValue::Unchanged(store.id.into_inner()),
            total_gold: Set(balance.total_gold),
            total_amount: Set(balance.total_amount),
            gold_taken: Set(balance.gold_taken),
            amount_taken: Set(balance.amount_taken),
            gold_given: Set(balance.gold_given),
            amount_given: Set(balance.amount_given),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(ledger_error)?;
        Ok(())
    }
}

#[async_trait]
impl TransactionLog for SeaOrmUnitOfWork {
    async fn insert_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction, LedgerError> {
        let trade = tx.trade;
        let model = transactions::ActiveModel {
            id: Set(tx.id.into_inner()),
            customer_id: Set(tx.customer_id.into_inner()),
            store_id: Set(tx.store_id.into_inner()),
            posted_by: Set(Some(tx.posted_by.into_inner())),
            trade_type: Set(trade.trade_type().into()),
            gold_weight: Set(trade.gold_weight()),
            gold_price: Set(trade.gold_price()),
            amount: Set(trade.amount()),
            payment_method: Set(trade.payment_method().into()),
            description: Set(tx.description.clone()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.txn)
        .await
        .map_err(ledger_error)?;
        Ok(Transaction::from(model))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(self) -> Result<(), LedgerError> {
        self.txn.commit().await.map_err(ledger_error)
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.txn.rollback().await.map_err(ledger_error)
    }
}
