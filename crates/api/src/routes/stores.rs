//! Store routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{ApiError, ApiResult, AppState, middleware::AuthAdmin};
use goldbook_core::ledger::{LedgerError, Store};
use goldbook_core::reports::StoreReconciliation;
use goldbook_db::{StoreRepository, TransactionRepository};
use goldbook_shared::types::AdminId;

/// Creates the store routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route(
            "/stores/{name}",
            get(get_store).put(rename_store).delete(delete_store),
        )
        .route("/stores/{name}/managers", post(grant_managers))
        .route("/stores/{name}/reconciliation", get(store_reconciliation))
}

/// Request body for creating or renaming a store.
#[derive(Debug, Deserialize)]
pub struct StoreNameRequest {
    /// Unique store name.
    pub name: String,
}

impl StoreNameRequest {
    fn trimmed(&self) -> ApiResult<&str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("name must not be empty"));
        }
        Ok(name)
    }
}

/// Request body for granting store management.
#[derive(Debug, Deserialize)]
pub struct GrantManagersRequest {
    /// Admins to grant.
    pub admin_ids: Vec<AdminId>,
}

async fn find_store(state: &AppState, name: &str) -> ApiResult<Store> {
    StoreRepository::new((*state.db).clone())
        .find_by_name(name)
        .await?
        .ok_or_else(|| LedgerError::StoreNotFound(name.to_string()).into())
}

/// POST /stores - The creator becomes the first manager.
async fn create_store(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<StoreNameRequest>,
) -> ApiResult<(StatusCode, Json<Store>)> {
    let name = payload.trimmed()?;
    let store = StoreRepository::new((*state.db).clone())
        .create(name, auth.admin_id())
        .await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// GET /stores
async fn list_stores(State(state): State<AppState>) -> ApiResult<Json<Vec<Store>>> {
    let stores = StoreRepository::new((*state.db).clone()).list().await?;
    Ok(Json(stores))
}

/// GET /stores/{name}
async fn get_store(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Store>> {
    find_store(&state, &name).await.map(Json)
}

/// PUT /stores/{name} - Rename. Any manager may rename.
async fn rename_store(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(name): Path<String>,
    Json(payload): Json<StoreNameRequest>,
) -> ApiResult<Json<Store>> {
    let new_name = payload.trimmed()?;
    let store = StoreRepository::new((*state.db).clone())
        .rename(&name, new_name, auth.admin_id())
        .await?;
    Ok(Json(store))
}

/// DELETE /stores/{name} - Creator only; 409 once trades were posted.
async fn delete_store(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    StoreRepository::new((*state.db).clone())
        .delete(&name, auth.admin_id())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /stores/{name}/managers - Creator only.
async fn grant_managers(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(name): Path<String>,
    Json(payload): Json<GrantManagersRequest>,
) -> ApiResult<Json<Store>> {
    if payload.admin_ids.is_empty() {
        return Err(ApiError::validation("admin_ids must not be empty"));
    }
    let store = StoreRepository::new((*state.db).clone())
        .grant_managers(&name, auth.admin_id(), &payload.admin_ids)
        .await?;
    Ok(Json(store))
}

/// GET /stores/{name}/reconciliation - Stored balance against a replay of
/// every transaction posted against the store.
async fn store_reconciliation(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<StoreReconciliation>> {
    let store = find_store(&state, &name).await?;
    let history = TransactionRepository::new((*state.db).clone())
        .for_store(store.id)
        .await?;
    Ok(Json(StoreReconciliation::new(&store, &history)?))
}
