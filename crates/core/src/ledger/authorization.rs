//! Store management checks.
//!
//! Any manager may post against or rename a store. Changing who manages it,
//! or deleting it, is reserved for the admin who created it.

use goldbook_shared::types::AdminId;

use super::error::LedgerError;
use super::types::Store;

/// Returns true iff `admin_id` is in the store's managing set.
#[must_use]
pub fn can_manage(store: &Store, admin_id: AdminId) -> bool {
    store.managers.contains(&admin_id)
}

/// Guard form of [`can_manage`].
///
/// # Errors
///
/// Returns `LedgerError::NotStoreManager` if the admin does not manage the store.
pub fn ensure_can_manage(store: &Store, admin_id: AdminId) -> Result<(), LedgerError> {
    if can_manage(store, admin_id) {
        Ok(())
    } else {
        Err(LedgerError::NotStoreManager {
            admin_id,
            store_id: store.id,
        })
    }
}

/// Returns true iff `admin_id` created the store.
///
/// A store whose creator was deleted has no owner.
#[must_use]
pub fn is_owner(store: &Store, admin_id: AdminId) -> bool {
    store.created_by == Some(admin_id)
}

/// Guard form of [`is_owner`].
///
/// # Errors
///
/// Returns `LedgerError::NotStoreOwner` if the admin did not create the store.
pub fn ensure_owner(store: &Store, admin_id: AdminId) -> Result<(), LedgerError> {
    if is_owner(store, admin_id) {
        Ok(())
    } else {
        Err(LedgerError::NotStoreOwner {
            admin_id,
            store_id: store.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::StoreBalance;
    use chrono::Utc;
    use goldbook_shared::types::StoreId;

    fn store_managed_by(managers: Vec<AdminId>) -> Store {
        Store {
            id: StoreId::new(),
            name: "Main".to_string(),
            created_by: managers.first().copied(),
            managers,
            balance: StoreBalance::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_creator_and_granted_admins_can_manage() {
        let creator = AdminId::new();
        let granted = AdminId::new();
        let store = store_managed_by(vec![creator, granted]);

        assert!(can_manage(&store, creator));
        assert!(can_manage(&store, granted));
        assert!(ensure_can_manage(&store, granted).is_ok());
    }

    #[test]
    fn test_outsider_is_forbidden() {
        let store = store_managed_by(vec![AdminId::new()]);
        let outsider = AdminId::new();

        assert!(!can_manage(&store, outsider));
        let err = ensure_can_manage(&store, outsider).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotStoreManager { admin_id, store_id }
                if admin_id == outsider && store_id == store.id
        ));
    }

    #[test]
    fn test_only_creator_owns() {
        let creator = AdminId::new();
        let granted = AdminId::new();
        let store = store_managed_by(vec![creator, granted]);

        assert!(ensure_owner(&store, creator).is_ok());
        assert!(can_manage(&store, granted));
        assert!(matches!(
            ensure_owner(&store, granted),
            Err(LedgerError::NotStoreOwner { admin_id, .. }) if admin_id == granted
        ));
    }

    #[test]
    fn test_orphaned_store_has_no_owner() {
        let manager = AdminId::new();
        let mut store = store_managed_by(vec![manager]);
        store.created_by = None;

        assert!(can_manage(&store, manager));
        assert!(!is_owner(&store, manager));
    }

    #[test]
    fn test_store_without_managers() {
        let store = store_managed_by(vec![]);
        assert!(!can_manage(&store, AdminId::new()));
    }
}
