//! Dining Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dining table entity (桌台)
///
/// The QR code printed on the table encodes the workspace and `table_number`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: String,
    pub workspace_id: String,
    pub table_number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1, max = 9999))]
    pub table_number: i32,
    #[validate(length(max = 40))]
    pub label: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(length(max = 40))]
    pub label: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}
