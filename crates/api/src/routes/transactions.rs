//! Transaction routes: posting, listing and filtered search.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState, middleware::AuthAdmin};
use goldbook_core::ledger::{
    LedgerError, PaymentMethod, PostTransactionInput, TradeType, Transaction, TransactionPoster,
};
use goldbook_core::reports::{TransactionFilter, parse_filters};
use goldbook_db::{SeaOrmLedger, TransactionRepository};
use goldbook_shared::types::{CustomerId, PageRequest, PageResponse, TransactionId};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/search", post(search_transactions))
        .route("/transactions/{id}", get(get_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for posting a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Customer the trade is made with.
    pub customer_id: CustomerId,
    /// Store to post against.
    pub store_name: String,
    /// `buy` or `sell`.
    #[serde(rename = "type")]
    pub trade_type: String,
    /// Gold weight in grams.
    pub gold_weight: Decimal,
    /// Price per gram.
    pub gold_price: Decimal,
    /// `cash`, `borrowed_gold`, `borrowed_money` or `upi`.
    pub payment_method: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Paging query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

impl PageQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Response for a filtered search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matching transactions on the requested page, newest first.
    pub transactions: Vec<Transaction>,
    /// Number of pages across all matches.
    pub total_pages: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transactions - Post a trade through the ledger poster.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let trade_type: TradeType = payload.trade_type.parse()?;
    let payment_method: PaymentMethod = payload.payment_method.parse()?;

    let poster = TransactionPoster::new(SeaOrmLedger::new((*state.db).clone()));
    let tx = poster
        .post(PostTransactionInput {
            admin_id: auth.admin_id(),
            customer_id: payload.customer_id,
            store_name: payload.store_name,
            trade_type,
            gold_weight: payload.gold_weight,
            gold_price: payload.gold_price,
            payment_method,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /transactions
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PageResponse<Transaction>>> {
    let page = TransactionRepository::new((*state.db).clone())
        .list(&query.page_request())
        .await?;
    Ok(Json(page))
}

/// GET /transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<TransactionId>,
) -> ApiResult<Json<Transaction>> {
    TransactionRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| LedgerError::TransactionNotFound(id).into())
}

/// POST /transactions/search - Filters combined with AND.
async fn search_transactions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Json(filters): Json<Vec<TransactionFilter>>,
) -> ApiResult<Json<SearchResponse>> {
    let conditions = parse_filters(&filters)?;
    let page = TransactionRepository::new((*state.db).clone())
        .search(&conditions, &query.page_request())
        .await?;

    Ok(Json(SearchResponse {
        transactions: page.data,
        total_pages: page.meta.total_pages,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;

    use super::*;
    use crate::routes::test_support::{protected, send};

    fn post_body(weight: &str, price: &str, trade_type: &str, method: &str) -> String {
        format!(
            r#"{{"customer_id":"{}","store_name":"Main","type":"{trade_type}","gold_weight":{weight},"gold_price":{price},"payment_method":"{method}","description":"test"}}"#,
            CustomerId::new()
        )
    }

    #[rstest]
    #[case(post_body("0", "\"5000\"", "sell", "cash"))]
    #[case(post_body("\"10\"", "\"-1\"", "sell", "cash"))]
    #[case(post_body("\"10.00001\"", "\"5000\"", "buy", "cash"))]
    #[case(post_body("\"10\"", "\"5000\"", "lend", "cash"))]
    #[case(post_body("\"10\"", "\"5000\"", "buy", "iou"))]
    #[case(post_body("\"1000000000000000\"", "\"10000000000\"", "buy", "cash"))]
    #[case(post_body("\"1234567890123456789012.3456\"", "\"1.0001\"", "sell", "upi"))]
    #[tokio::test]
    async fn test_invalid_posts_rejected_before_storage(#[case] body: String) {
        let (status, body) = send(protected(routes()), "POST", "/transactions", Some(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_storage_failure_uses_generic_message() {
        let body = post_body("\"10\"", "\"5000\"", "sell", "borrowed_gold");
        let (status, body) = send(protected(routes()), "POST", "/transactions", Some(&body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[rstest]
    #[case(r#"[{"operation":"gt","operator":"type","value":"buy"}]"#)]
    #[case(r#"[{"operation":"eq","operator":"amount","value":"5"}]"#)]
    #[case(r#"[{"operation":"eq","operator":"created_at","value":"yesterday"}]"#)]
    #[tokio::test]
    async fn test_invalid_search_filters(#[case] body: &str) {
        let (status, _) = send(protected(routes()), "POST", "/transactions/search", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
