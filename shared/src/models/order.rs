//! Order Model

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::order::reason::{ITEM_UNAVAILABLE, is_removed_items_reason, parse_removed_items};
use crate::order::{OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
use crate::util::normalize_phone;

/// Order entity (订单)
///
/// One row per customer submission. A table+phone pair usually accumulates
/// several orders during a visit; billing groups them later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub workspace_id: String,
    pub table_number: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<OrderItem>,
    /// Sum of non-cancelled line totals
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Order {
    /// Line items that still count towards the total
    pub fn active_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|item| !item.cancelled)
    }

    /// Names of lines removed by availability reconciliation, first spelling
    /// wins per normalized name
    ///
    /// Read from the cancelled lines. Legacy rows whose lines carry no cancel
    /// reason fall back to the names listed in `status_reason`.
    pub fn removed_item_names(&self) -> Vec<String> {
        let reason = self.status_reason.as_deref().unwrap_or_default();
        let legacy = is_removed_items_reason(reason);

        let mut keys = HashSet::new();
        let names: Vec<String> = self
            .items
            .iter()
            .filter(|item| item.cancelled)
            .filter(|item| match item.cancel_reason.as_deref() {
                Some(r) => r == ITEM_UNAVAILABLE,
                None => legacy,
            })
            .filter(|item| keys.insert(item.name_key()))
            .map(|item| item.name.trim().to_string())
            .collect();

        if names.is_empty() && legacy {
            return parse_removed_items(reason);
        }
        names
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Whether this order was placed from the given table by the given phone
    pub fn belongs_to(&self, table_number: i32, phone: &str) -> bool {
        self.table_number == table_number
            && normalize_phone(&self.customer_phone) == normalize_phone(phone)
    }
}

/// Admin order listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub table_number: Option<i32>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Only orders created after this timestamp (millis)
    pub since: Option<i64>,
    pub limit: Option<usize>,
}
