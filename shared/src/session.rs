//! Request-scoped session objects
//!
//! Every operation receives the session that made the request instead of
//! reading ambient state. A customer session is bound to one table of one
//! workspace; a staff session carries the staff role.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, ErrorCode};
use crate::util::normalize_phone;

/// Customer session created by scanning a table QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSession {
    pub workspace_id: String,
    pub table_number: i32,
    pub customer_name: String,
    pub customer_phone: String,
}

impl CustomerSession {
    pub fn new(
        workspace_id: impl Into<String>,
        table_number: i32,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            table_number,
            customer_name: customer_name.into().trim().to_string(),
            customer_phone: normalize_phone(&customer_phone.into()),
        }
    }

    /// Placing orders needs a name and a plausible phone number
    pub fn require_identity(&self) -> Result<(), AppError> {
        if self.customer_name.is_empty() {
            return Err(AppError::new(ErrorCode::SessionIncomplete)
                .with_detail("field", "customer_name"));
        }
        let digits = self
            .customer_phone
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count();
        if !(6..=15).contains(&digits) {
            return Err(AppError::new(ErrorCode::SessionIncomplete)
                .with_detail("field", "customer_phone"));
        }
        Ok(())
    }
}

/// 员工角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Kitchen,
    Admin,
}

impl StaffRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kitchen" => Some(StaffRole::Kitchen),
            "admin" => Some(StaffRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffRole::Kitchen => f.write_str("kitchen"),
            StaffRole::Admin => f.write_str("admin"),
        }
    }
}

/// Staff session (kitchen display or admin console)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSession {
    pub workspace_id: String,
    pub role: StaffRole,
}

impl StaffSession {
    pub fn new(workspace_id: impl Into<String>, role: StaffRole) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }
}
