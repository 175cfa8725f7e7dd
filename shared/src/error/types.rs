//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type surfaced to clients, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages (falling back to the code's default text)
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    ///
    /// An empty message falls back to the code's default text.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.message().to_string()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Backend or serialization failure (details are logged, not returned)
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an already exists error
    pub fn already_exists(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::AlreadyExists, format!("{} already exists", r))
            .with_detail("resource", r)
    }

    /// Create a tenant-not-selected error
    pub fn tenant_not_selected() -> Self {
        Self::new(ErrorCode::TenantNotSelected)
    }
}

/// Unified API response structure
///
/// Provides a consistent response format for all API endpoints:
/// - `code`: Error code (0 for success)
/// - `message`: Human-readable message
/// - `data`: Response payload (on success)
/// - `details`: Additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(0),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // System errors are logged with their detail, clients only see the fallback text
        let body = if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            ApiResponse::<()>::error(&AppError::new(self.code))
        } else {
            ApiResponse::<()>::error(&self)
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_blank_message_falls_back_to_code_text() {
        let err = AppError::with_message(ErrorCode::CancellationNotAllowed, "  ");
        assert_eq!(err.message, ErrorCode::CancellationNotAllowed.message());
        assert_eq!(AppError::new(ErrorCode::BillEmpty).message, "No unpaid orders for this table");
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::new(ErrorCode::MenuItemUnavailable)
            .with_detail("menu_item_id", "m-lassi")
            .with_detail("table_number", 4);
        let details = err.details.unwrap();
        assert_eq!(details["menu_item_id"], "m-lassi");
        assert_eq!(details["table_number"], 4);
    }

    #[test]
    fn test_repository_helpers() {
        let err = AppError::not_found("orders:o-9");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "orders:o-9 not found");
        assert_eq!(AppError::already_exists("tables:t-1").http_status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::permission_denied("not your order").http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_error_envelope_keeps_details() {
        let err = AppError::new(ErrorCode::BillAlreadyPaid).with_detail("bill_id", "b-1");
        let body = serde_json::to_value(ApiResponse::<()>::error(&err)).unwrap();
        assert_eq!(body["code"], 4102);
        assert_eq!(body["details"]["bill_id"], "b-1");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_system_errors_hide_internal_message() {
        let response = AppError::database("connection reset by peer").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success_with_message("Order placed", 7)).unwrap();
        assert_eq!(body["code"], 0);
        assert_eq!(body["message"], "Order placed");
        assert_eq!(body["data"], 7);
    }
}
