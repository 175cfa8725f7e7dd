//! Final Bill Model

use serde::{Deserialize, Serialize};

use crate::order::PaymentMethod;

/// Aggregated bill line (same name + unit price across orders)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillLineItem {
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Final bill entity (结账单)
///
/// Persisted snapshot of the unpaid orders of one table+phone pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalBill {
    pub id: String,
    pub workspace_id: String,
    pub table_number: i32,
    pub customer_name: String,
    pub customer_phone: String,
    /// Constituent orders, oldest first
    pub order_ids: Vec<String>,
    pub items: Vec<BillLineItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub created_at: i64,
}
