//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    pub sort_order: Option<i32>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
