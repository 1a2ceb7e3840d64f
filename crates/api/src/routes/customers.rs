//! Customer routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState, middleware::AuthAdmin};
use goldbook_core::ledger::{Customer, LedgerError, Transaction};
use goldbook_core::reports::CustomerReconciliation;
use goldbook_db::repositories::CustomerProfile;
use goldbook_db::{CustomerRepository, TransactionRepository};
use goldbook_shared::types::{CustomerId, PageRequest, PageResponse};

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/{id}/transactions", get(customer_transactions))
        .route("/customers/{id}/balance", get(customer_balance))
        .route("/customers/{id}/reconciliation", get(customer_reconciliation))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or updating a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    /// Display name.
    pub name: String,
    /// Unique phone number.
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
}

impl CustomerRequest {
    fn into_profile(self) -> ApiResult<CustomerProfile> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        if name.is_empty() {
            return Err(ApiError::validation("name must not be empty"));
        }
        if phone.is_empty() {
            return Err(ApiError::validation("phone must not be empty"));
        }
        Ok(CustomerProfile {
            name: name.to_string(),
            phone: phone.to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

/// Query parameters for listing customers.
#[derive(Debug, Default, Deserialize)]
pub struct ListCustomersQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
    /// Name substring to search for.
    pub name: Option<String>,
}

impl ListCustomersQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Outstanding balances of a customer.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Customer ID.
    pub customer_id: CustomerId,
    /// Net gold owed, in grams. Positive means the store owes the customer.
    pub borrowed_gold: Decimal,
    /// Net money owed. Positive means the store owes the customer.
    pub borrowed_amount: Decimal,
    /// Gold bought from the customer.
    pub total_bought: Decimal,
    /// Gold sold to the customer.
    pub total_sold: Decimal,
}

// ============================================================================
// Handlers
// ============================================================================

async fn find_customer(state: &AppState, id: CustomerId) -> ApiResult<Customer> {
    CustomerRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| LedgerError::CustomerNotFound(id).into())
}

/// POST /customers
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CustomerRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let profile = payload.into_profile()?;
    let customer = CustomerRepository::new((*state.db).clone())
        .create(&profile)
        .await?;

    info!(customer_id = %customer.id, admin_id = %auth.admin_id(), "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers
async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> ApiResult<Json<PageResponse<Customer>>> {
    let page = CustomerRepository::new((*state.db).clone())
        .list(&query.page_request(), query.name.as_deref())
        .await?;
    Ok(Json(page))
}

/// GET /customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> ApiResult<Json<Customer>> {
    find_customer(&state, id).await.map(Json)
}

/// PUT /customers/{id} - Profile fields only; balances are moved by posting.
async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(payload): Json<CustomerRequest>,
) -> ApiResult<Json<Customer>> {
    let profile = payload.into_profile()?;
    let customer = CustomerRepository::new((*state.db).clone())
        .update_profile(id, &profile)
        .await?;
    Ok(Json(customer))
}

/// DELETE /customers/{id}
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<CustomerId>,
) -> ApiResult<StatusCode> {
    CustomerRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    info!(customer_id = %id, admin_id = %auth.admin_id(), "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/{id}/transactions - Full history, oldest first.
async fn customer_transactions(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> ApiResult<Json<Vec<Transaction>>> {
    find_customer(&state, id).await?;
    let history = TransactionRepository::new((*state.db).clone())
        .for_customer(id)
        .await?;
    Ok(Json(history))
}

/// GET /customers/{id}/balance
async fn customer_balance(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> ApiResult<Json<BalanceResponse>> {
    let customer = find_customer(&state, id).await?;
    let balance = customer.balance;
    Ok(Json(BalanceResponse {
        customer_id: customer.id,
        borrowed_gold: balance.borrowed_gold,
        borrowed_amount: balance.borrowed_amount,
        total_bought: balance.total_bought,
        total_sold: balance.total_sold,
    }))
}

/// GET /customers/{id}/reconciliation - Stored balance against a replay of
/// the customer's history.
async fn customer_reconciliation(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> ApiResult<Json<CustomerReconciliation>> {
    let customer = find_customer(&state, id).await?;
    let history = TransactionRepository::new((*state.db).clone())
        .for_customer(id)
        .await?;
    Ok(Json(CustomerReconciliation::new(&customer, &history)?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;

    use super::*;
    use crate::routes::test_support::{protected, send};

    #[rstest]
    #[case(r#"{"name":"","phone":"+91-1"}"#)]
    #[case(r#"{"name":"Ravi","phone":"   "}"#)]
    #[tokio::test]
    async fn test_create_rejects_blank_fields(#[case] body: &str) {
        let (status, body) = send(protected(routes()), "POST", "/customers", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_storage_failure_hides_details() {
        let uri = format!("/customers/{}", CustomerId::new());
        let (status, body) = send(protected(routes()), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListCustomersQuery::default();
        let page = query.page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 20);
    }
}
