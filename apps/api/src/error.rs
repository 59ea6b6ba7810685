//! # API Error Type
//!
//! The JSON error body and the status code it travels with.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vault                                  │
//! │                                                                         │
//! │  Handler                                                               │
//! │     │                                                                   │
//! │     ├── bad path id / malformed JSON ──────────────► VALIDATION_ERROR   │
//! │     │                                                   (400)          │
//! │     ▼                                                                   │
//! │  ItemUsecase ── ItemError::Validation ─────────────► VALIDATION_ERROR   │
//! │              ── ItemError::NotFound ───────────────► NOT_FOUND (404)    │
//! │              ── ItemError::Database ───────────────► DATABASE_ERROR     │
//! │                                                         (500)          │
//! │              ── ItemError::Cancelled ──────────────► REQUEST_CANCELLED  │
//! │                                                         (503)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```json
//! { "code": "NOT_FOUND", "message": "Item not found: 42" }
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use vault_core::ItemError;

/// API error returned from handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Cancelled or timed out (503)
    RequestCancelled,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::RequestCancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts usecase errors to API errors.
impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Validation(e) => ApiError::validation(e.to_string()),
            ItemError::NotFound(id) => {
                ApiError::new(ErrorCode::NotFound, format!("Item not found: {id}"))
            }
            ItemError::Database => {
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            ItemError::Cancelled => ApiError::new(
                ErrorCode::RequestCancelled,
                "Request cancelled or timed out",
            ),
        }
    }
}

/// Malformed or mistyped request bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::ValidationError;

    #[test]
    fn test_item_error_mapping() {
        let cases = [
            (
                ItemError::Validation(ValidationError::EmptyUpdate),
                ErrorCode::ValidationError,
                StatusCode::BAD_REQUEST,
            ),
            (ItemError::NotFound(9), ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (
                ItemError::Database,
                ErrorCode::DatabaseError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ItemError::Cancelled,
                ErrorCode::RequestCancelled,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, code, status) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.code, code);
            assert_eq!(api.status(), status);
        }
    }

    #[test]
    fn test_json_shape() {
        let api = ApiError::from(ItemError::NotFound(42));
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Item not found: 42");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::validation("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
