//! API error responses.
//!
//! Every handler error becomes `{"error": "<code>", "message": "<text>"}`
//! with the status of the wrapped [`AppError`]. Server-side messages are
//! logged and replaced with a generic text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use goldbook_core::ledger::LedgerError;
use goldbook_core::reports::ReportError;
use goldbook_shared::AppError;
use serde_json::json;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 401 with a message.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 400 with a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 500; the message is only logged.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self(AppError::Internal(message.into()))
    }
}

const GENERIC_MESSAGE: &str = "An internal error occurred";

fn message(err: &AppError) -> &str {
    match err {
        AppError::Unauthorized(m)
        | AppError::Forbidden(m)
        | AppError::NotFound(m)
        | AppError::Validation(m)
        | AppError::Conflict(m)
        | AppError::Database(m)
        | AppError::Internal(m) => m,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let text = if self.0.is_client_error() {
            message(&self.0).to_string()
        } else {
            error!(error = %self.0, "Request failed");
            GENERIC_MESSAGE.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code().to_lowercase(),
                "message": text,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldbook_shared::types::CustomerId;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::Value;

    async fn body(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let id = CustomerId::new();
        let (status, body) = body(LedgerError::CustomerNotFound(id).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], format!("Customer not found: {id}"));
    }

    #[rstest]
    #[case(AppError::Database("relation \"customers\" does not exist".into()))]
    #[case(AppError::Internal("token signing failed".into()))]
    #[tokio::test]
    async fn test_server_error_hides_message(#[case] err: AppError) {
        let (status, body) = body(ApiError(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn test_report_error_is_bad_request() {
        let (status, body) = body(ReportError::InvalidMonth(13).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
