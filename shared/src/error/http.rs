//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::BillNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::TableNotFound
            | Self::ServiceRequestNotFound
            | Self::TenantNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderAlreadyPaid
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled
            | Self::BillAlreadyPaid
            | Self::BillStale
            | Self::TableNumberExists => StatusCode::CONFLICT,

            // 422 Unprocessable (business rule rejected the transition)
            Self::InvalidStatusTransition
            | Self::CancellationNotAllowed
            | Self::MenuItemUnavailable
            | Self::TableInactive
            | Self::BillEmpty
            | Self::OrderEmpty => StatusCode::UNPROCESSABLE_ENTITY,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::SessionExpired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::AdminRequired
            | Self::TenantNotSelected => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::SchemaMismatch
            | Self::PaymentFailed
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
