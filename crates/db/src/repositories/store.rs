//! Store repository for database operations.

use std::collections::HashMap;

use chrono::Utc;
use goldbook_core::ledger::{LedgerError, Store, ensure_can_manage, ensure_owner};
use goldbook_shared::types::{AdminId, StoreId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{admins, store_admins, stores, transactions};
use crate::error::ledger_error;
use crate::unit_of_work::store_managers;

/// Store repository.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    db: DatabaseConnection,
}

impl StoreRepository {
    /// Creates a new store repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a store with zero balances. The creator becomes its first
    /// manager.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Conflict` if the name is taken.
    pub async fn create(&self, name: &str, created_by: AdminId) -> Result<Store, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_error)?;
        let now = Utc::now().into();

        let model = stores::ActiveModel {
            id: Set(StoreId::new().into_inner()),
            name: Set(name.to_string()),
            created_by: Set(Some(created_by.into_inner())),
            total_gold: Set(Decimal::ZERO),
            total_amount: Set(Decimal::ZERO),
            gold_taken: Set(Decimal::ZERO),
            amount_taken: Set(Decimal::ZERO),
            gold_given: Set(Decimal::ZERO),
            amount_given: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ledger_error)?;

        store_admins::ActiveModel {
            store_id: Set(model.id),
            admin_id: Set(created_by.into_inner()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ledger_error)?;

        txn.commit().await.map_err(ledger_error)?;
        info!(store_id = %model.id, admin_id = %created_by, "Store created");
        Ok(model.into_store(vec![created_by]))
    }

    /// Finds a store and its managers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Store>, LedgerError> {
        let Some(model) = stores::Entity::find()
            .filter(stores::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(ledger_error)?
        else {
            return Ok(None);
        };

        let managers = store_managers(&self.db, model.id.into()).await?;
        Ok(Some(model.into_store(managers)))
    }

    /// Lists all stores with their managers, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Store>, LedgerError> {
        let models = stores::Entity::find()
            .order_by_asc(stores::Column::Name)
            .all(&self.db)
            .await
            .map_err(ledger_error)?;
        self.with_managers(models).await
    }

    /// Lists the stores `admin_id` manages, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn managed_by(&self, admin_id: AdminId) -> Result<Vec<Store>, LedgerError> {
        let models = stores::Entity::find()
            .inner_join(store_admins::Entity)
            .filter(store_admins::Column::AdminId.eq(admin_id.into_inner()))
            .order_by_asc(stores::Column::Name)
            .all(&self.db)
            .await
            .map_err(ledger_error)?;
        self.with_managers(models).await
    }

    async fn with_managers(&self, models: Vec<stores::Model>) -> Result<Vec<Store>, LedgerError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut managers: HashMap<_, Vec<AdminId>> = HashMap::new();
        for row in store_admins::Entity::find()
            .filter(store_admins::Column::StoreId.is_in(models.iter().map(|model| model.id)))
            .order_by_asc(store_admins::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(ledger_error)?
        {
            managers
                .entry(row.store_id)
                .or_default()
                .push(row.admin_id.into());
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let ids = managers.remove(&model.id).unwrap_or_default();
                model.into_store(ids)
            })
            .collect())
    }

    /// Renames a store. Any manager may rename.
    ///
    /// Transactions reference the store by ID, so history follows the new
    /// name. Posts against the old name that wait on the row lock fail with
    /// `StoreNotFound` once the rename commits.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreNotFound`, `LedgerError::NotStoreManager`,
    /// or `LedgerError::Conflict` if `new_name` is taken.
    pub async fn rename(
        &self,
        name: &str,
        new_name: &str,
        renamed_by: AdminId,
    ) -> Result<Store, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_error)?;
        let store = lock_by_name(&txn, name).await?;
        ensure_can_manage(&store, renamed_by)?;

        if store.name == new_name {
            txn.commit().await.map_err(ledger_error)?;
            return Ok(store);
        }

        let model = stores::ActiveModel {
            id: ActiveValue::Unchanged(store.id.into_inner()),
            name: Set(new_name.to_string()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(ledger_error)?;

        txn.commit().await.map_err(ledger_error)?;
        info!(store_id = %store.id, from = %name, to = %new_name, %renamed_by, "Store renamed");
        Ok(model.into_store(store.managers))
    }

    /// Deletes a store without history. Only the creator may delete.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreNotFound`, `LedgerError::NotStoreOwner`, or
    /// `LedgerError::Conflict` if transactions were posted against it.
    pub async fn delete(&self, name: &str, deleted_by: AdminId) -> Result<(), LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_error)?;
        let store = lock_by_name(&txn, name).await?;
        ensure_owner(&store, deleted_by)?;

        let history = transactions::Entity::find()
            .filter(transactions::Column::StoreId.eq(store.id.into_inner()))
            .count(&txn)
            .await
            .map_err(ledger_error)?;
        if history > 0 {
            return Err(LedgerError::Conflict(format!(
                "store {name} has {history} transactions and cannot be deleted"
            )));
        }

        stores::Entity::delete_by_id(store.id.into_inner())
            .exec(&txn)
            .await
            .map_err(ledger_error)?;

        txn.commit().await.map_err(ledger_error)?;
        info!(store_id = %store.id, %deleted_by, "Store deleted");
        Ok(())
    }

    /// Grants management of the store to each admin in `admin_ids`.
    ///
    /// Only the store's creator may grant. Admins who already manage the
    /// store are skipped. Either every admin is granted or none is.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreNotFound`, `LedgerError::NotStoreOwner`, or
    /// `LedgerError::AdminNotFound` for the first unknown admin.
    pub async fn grant_managers(
        &self,
        name: &str,
        granted_by: AdminId,
        admin_ids: &[AdminId],
    ) -> Result<Store, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_error)?;
        let mut store = lock_by_name(&txn, name).await?;
        ensure_owner(&store, granted_by)?;

        for &admin_id in admin_ids {
            if store.managers.contains(&admin_id) {
                continue;
            }
            if admins::Entity::find_by_id(admin_id.into_inner())
                .one(&txn)
                .await
                .map_err(ledger_error)?
                .is_none()
            {
                return Err(LedgerError::AdminNotFound(admin_id));
            }

            store_admins::ActiveModel {
                store_id: Set(store.id.into_inner()),
                admin_id: Set(admin_id.into_inner()),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(ledger_error)?;
            store.managers.push(admin_id);
            info!(store_id = %store.id, %admin_id, %granted_by, "Store manager granted");
        }

        txn.commit().await.map_err(ledger_error)?;
        Ok(store)
    }
}

/// Loads a store by name under a row lock, with its managers.
async fn lock_by_name(txn: &DatabaseTransaction, name: &str) -> Result<Store, LedgerError> {
    let model = stores::Entity::find()
        .filter(stores::Column::Name.eq(name))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(ledger_error)?
        .ok_or_else(|| LedgerError::StoreNotFound(name.to_string()))?;
    let managers = store_managers(txn, model.id.into()).await?;
    Ok(model.into_store(managers))
}
