//! Customer repository for database operations.
//!
//! Balances are never written here; only the transaction poster moves them.

use chrono::Utc;
use goldbook_core::ledger::{Customer, LedgerError};
use goldbook_shared::types::{CustomerId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{customers, transactions};
use crate::error::ledger_error;

/// Editable customer fields.
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    /// Display name.
    pub name: String,
    /// Unique phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer with zero balances.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Conflict` if the phone number is taken.
    pub async fn create(&self, profile: &CustomerProfile) -> Result<Customer, LedgerError> {
        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            name: Set(profile.name.clone()),
            phone: Set(profile.phone.clone()),
            address: Set(profile.address.clone()),
            borrowed_gold: Set(Decimal::ZERO),
            total_bought: Set(Decimal::ZERO),
            total_sold: Set(Decimal::ZERO),
            borrowed_amount: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        customer
            .insert(&self.db)
            .await
            .map(Customer::from)
            .map_err(ledger_error)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, LedgerError> {
        let model = customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(ledger_error)?;
        Ok(model.map(Customer::from))
    }

    /// Lists customers, newest first, optionally filtered by a name substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
        name: Option<&str>,
    ) -> Result<PageResponse<Customer>, LedgerError> {
        let page = page.clamped();
        let mut query = customers::Entity::find();
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            query = query.filter(customers::Column::Name.contains(name));
        }

        let total = query.clone().count(&self.db).await.map_err(ledger_error)?;
        let rows = query
            .order_by_desc(customers::Column::CreatedAt)
            .order_by_desc(customers::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(ledger_error)?;

        Ok(PageResponse::new(
            rows.into_iter().map(Customer::from).collect(),
            page.page,
            page.per_page,
            total,
        ))
    }

    /// Updates the profile fields of a customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CustomerNotFound` if the customer does not exist,
    /// or `LedgerError::Conflict` if the new phone number is taken.
    pub async fn update_profile(
        &self,
        id: CustomerId,
        profile: &CustomerProfile,
    ) -> Result<Customer, LedgerError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(LedgerError::CustomerNotFound(id));
        }

        customers::ActiveModel {
            id: ActiveValue::Unchanged(id.into_inner()),
            name: Set(profile.name.clone()),
            phone: Set(profile.phone.clone()),
            address: Set(profile.address.clone()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map(Customer::from)
        .map_err(ledger_error)
    }

    /// Deletes a customer without history.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Conflict` if the customer has transactions, or
    /// `LedgerError::CustomerNotFound` if it does not exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), LedgerError> {
        let history = transactions::Entity::find()
            .filter(transactions::Column::CustomerId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(ledger_error)?;
        if history > 0 {
            return Err(LedgerError::Conflict(format!(
                "customer {id} has {history} transactions and cannot be deleted"
            )));
        }

        let result = customers::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(ledger_error)?;
        if result.rows_affected == 0 {
            return Err(LedgerError::CustomerNotFound(id));
        }
        Ok(())
    }
}
