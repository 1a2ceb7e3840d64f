//! Shared helpers for route tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
};
use goldbook_shared::{JwtConfig, JwtService, types::AdminId};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, middleware::auth_middleware};

/// State with a disconnected database: any query fails with a database error.
pub fn test_state() -> AppState {
    AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
    }
}

/// Wraps routes in the auth middleware, as the real router does.
pub fn protected(routes: Router<AppState>) -> Router {
    let state = test_state();
    routes
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// A valid token for a fresh admin.
pub fn token() -> String {
    test_state()
        .jwt_service
        .generate_access_token(AdminId::new())
        .unwrap()
}

/// Sends a request and returns status and JSON body (`Null` if empty).
pub async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token()));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
