//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu item entity (菜品)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub workspace_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price in currency unit
    pub price: f64,
    /// Public URL of the item photo (resolved from storage)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    pub category_id: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub price: f64,
    /// Storage path of an uploaded photo ("menu/dosa.jpg")
    pub image_path: Option<String>,
    pub is_available: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MenuItemUpdate {
    pub category_id: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub price: Option<f64>,
    pub image_path: Option<String>,
    pub sort_order: Option<i32>,
}
