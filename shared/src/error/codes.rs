//! Unified error codes for the ordering platform
//!
//! This module defines all error codes used across order-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Session errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant errors
//! - 4xxx: Order / bill errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table / service request errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Session ====================
    /// No session attached to the request
    NotAuthenticated = 1001,
    /// Session has expired
    SessionExpired = 1005,
    /// Session is missing customer details
    SessionIncomplete = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Tenant ====================
    /// Workspace not selected
    TenantNotSelected = 3001,
    /// Workspace not found
    TenantNotFound = 3002,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderAlreadyPaid = 4002,
    OrderAlreadyCompleted = 4003,
    OrderAlreadyCancelled = 4004,
    OrderEmpty = 4007,
    InvalidStatusTransition = 4008,
    CancellationNotAllowed = 4009,
    BillNotFound = 4101,
    BillAlreadyPaid = 4102,
    BillEmpty = 4103,
    /// Orders changed after the bill was generated
    BillStale = 4104,

    // ==================== 5xxx: Payment ====================
    PaymentFailed = 5001,
    PaymentInvalidMethod = 5003,

    // ==================== 6xxx: Menu ====================
    MenuItemNotFound = 6001,
    MenuItemInvalidPrice = 6002,
    MenuItemUnavailable = 6003,
    CategoryNotFound = 6101,

    // ==================== 7xxx: Table ====================
    TableNotFound = 7001,
    TableInactive = 7002,
    TableNumberExists = 7003,
    ServiceRequestNotFound = 7201,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
    SchemaMismatch = 9006,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Session
            ErrorCode::NotAuthenticated => "No session attached to the request",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::SessionIncomplete => "Please enter your name and phone number",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Tenant
            ErrorCode::TenantNotSelected => "No workspace selected",
            ErrorCode::TenantNotFound => "Workspace not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidStatusTransition => "Order status cannot be changed this way",
            ErrorCode::CancellationNotAllowed => {
                "Order can no longer be cancelled, please ask the staff"
            }
            ErrorCode::BillNotFound => "Bill not found",
            ErrorCode::BillAlreadyPaid => "Bill has already been paid",
            ErrorCode::BillEmpty => "No unpaid orders for this table",
            ErrorCode::BillStale => "Orders changed since the bill was generated, please regenerate it",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemUnavailable => "Menu item is currently unavailable",
            ErrorCode::CategoryNotFound => "Category not found",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableInactive => "Table is not taking orders",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::ServiceRequestNotFound => "Service request not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SchemaMismatch => "Backend schema does not match the expected contract",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Session
            1001 => Ok(ErrorCode::NotAuthenticated),
            1005 => Ok(ErrorCode::SessionExpired),
            1008 => Ok(ErrorCode::SessionIncomplete),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Tenant
            3001 => Ok(ErrorCode::TenantNotSelected),
            3002 => Ok(ErrorCode::TenantNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidStatusTransition),
            4009 => Ok(ErrorCode::CancellationNotAllowed),
            4101 => Ok(ErrorCode::BillNotFound),
            4102 => Ok(ErrorCode::BillAlreadyPaid),
            4103 => Ok(ErrorCode::BillEmpty),
            4104 => Ok(ErrorCode::BillStale),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6003 => Ok(ErrorCode::MenuItemUnavailable),
            6101 => Ok(ErrorCode::CategoryNotFound),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableInactive),
            7003 => Ok(ErrorCode::TableNumberExists),
            7201 => Ok(ErrorCode::ServiceRequestNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::SchemaMismatch),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
