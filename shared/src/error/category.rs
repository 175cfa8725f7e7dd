//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Session errors
/// - 2xxx: Permission errors
/// - 3xxx: Tenant errors
/// - 4xxx: Order / bill errors
/// - 5xxx: Payment errors
/// - 6xxx: Menu errors
/// - 7xxx: Table / service request errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Session errors (1xxx)
    Session,
    /// Permission errors (2xxx)
    Permission,
    /// Tenant errors (3xxx)
    Tenant,
    /// Order and bill errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Menu errors (6xxx)
    Menu,
    /// Table and service request errors (7xxx)
    Table,
    /// System errors (8xxx and 9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Session,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Tenant,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Menu,
            7000..8000 => Self::Table,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Session => "session",
            Self::Permission => "permission",
            Self::Tenant => "tenant",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
