//! Admin repository for database operations.

use chrono::Utc;
use goldbook_core::ledger::{Admin, LedgerError};
use goldbook_shared::types::AdminId;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::admins;
use crate::error::ledger_error;

/// An admin together with the stored password hash, for login.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    /// The admin.
    pub admin: Admin,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Admin repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    /// Creates a new admin repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an admin and its password hash by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_credentials(&self, email: &str) -> Result<Option<AdminCredentials>, LedgerError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(ledger_error)?;

        Ok(model.map(|m| AdminCredentials {
            password_hash: m.password_hash.clone(),
            admin: Admin::from(m),
        }))
    }

    /// Finds an admin by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, LedgerError> {
        let model = admins::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(ledger_error)?;
        Ok(model.map(Admin::from))
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, LedgerError> {
        let count = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(ledger_error)?;
        Ok(count > 0)
    }

    /// Creates a new admin.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Conflict` if the email is taken, or an error if
    /// the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Admin, LedgerError> {
        let now = Utc::now().into();
        let admin = admins::ActiveModel {
            id: Set(AdminId::new().into_inner()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        admin
            .insert(&self.db)
            .await
            .map(Admin::from)
            .map_err(ledger_error)
    }

    /// Renames an admin.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AdminNotFound` if the admin does not exist.
    pub async fn update_name(&self, id: AdminId, name: &str) -> Result<Admin, LedgerError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(LedgerError::AdminNotFound(id));
        }

        admins::ActiveModel {
            id: ActiveValue::Unchanged(id.into_inner()),
            name: Set(name.to_string()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map(Admin::from)
        .map_err(ledger_error)
    }
}
