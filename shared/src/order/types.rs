//! Shared value types for orders and payments

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::normalize_name;

// ============================================================================
// Payment
// ============================================================================

/// 支付状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
        }
    }
}

/// 支付方式
///
/// Stored lowercase, matching the backend's `payment_method` enum values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Online,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::Online,
    ];

    /// Normalize free-form input ("Credit Card", " CASH ", "gpay") into a method
    pub fn parse(input: &str) -> Option<Self> {
        let key = normalize_name(input).replace(['-', '_'], " ");
        match key.as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" | "credit card" | "debit card" | "credit" | "debit" | "pos" => {
                Some(PaymentMethod::Card)
            }
            "upi" | "gpay" | "google pay" | "phonepe" | "paytm" | "bhim" => {
                Some(PaymentMethod::Upi)
            }
            "online" | "net banking" | "netbanking" | "wallet" => Some(PaymentMethod::Online),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// Order line item snapshot
///
/// Name and unit price are copied from the menu when the order is placed, so
/// later menu edits never change what the customer ordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Menu item reference (absent on legacy rows, matched by name instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_item_id: Option<String>,
    /// Item name snapshot
    pub name: String,
    /// Unit price snapshot
    pub price: f64,
    /// Quantity
    pub quantity: i32,
    /// Removed after placement (e.g. item became unavailable)
    #[serde(default)]
    pub cancelled: bool,
    /// Why the item was removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl OrderItem {
    pub fn new(
        menu_item_id: Option<String>,
        name: impl Into<String>,
        price: f64,
        quantity: i32,
    ) -> Self {
        Self {
            menu_item_id,
            name: name.into(),
            price,
            quantity,
            cancelled: false,
            cancel_reason: None,
        }
    }

    /// Normalized name used for name-based matching
    pub fn name_key(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Item requested by the customer when placing an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub quantity: i32,
}
