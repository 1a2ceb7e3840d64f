//! Profile routes for the signed-in admin.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;

use crate::{ApiError, ApiResult, AppState, middleware::AuthAdmin};
use goldbook_core::ledger::{Admin, LedgerError, Store};
use goldbook_db::{AdminRepository, StoreRepository};

/// Creates the admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admins/me", get(me).put(update_me))
        .route("/admins/me/stores", get(my_stores))
}

/// Request body for updating the profile.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: String,
}

/// GET /admins/me
async fn me(State(state): State<AppState>, auth: AuthAdmin) -> ApiResult<Json<Admin>> {
    let admin_id = auth.admin_id();
    AdminRepository::new((*state.db).clone())
        .find_by_id(admin_id)
        .await?
        .map(Json)
        .ok_or_else(|| LedgerError::AdminNotFound(admin_id).into())
}

/// PUT /admins/me
async fn update_me(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Admin>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }

    let admin = AdminRepository::new((*state.db).clone())
        .update_name(auth.admin_id(), name)
        .await?;
    Ok(Json(admin))
}

/// GET /admins/me/stores - Stores the signed-in admin manages.
async fn my_stores(State(state): State<AppState>, auth: AuthAdmin) -> ApiResult<Json<Vec<Store>>> {
    let stores = StoreRepository::new((*state.db).clone())
        .managed_by(auth.admin_id())
        .await?;
    Ok(Json(stores))
}
