//! Bulk payment marking
//!
//! Marks a set of orders PAID in one backend call. The payment method text is
//! normalized first ("Credit Card" → `card`); a method the backend enum cannot
//! store is downgraded to the configured default and reported back.

use serde::{Deserialize, Serialize};
use shared::models::Order;
use shared::order::{OrderStatus, PaymentMethod};
use shared::util::now_millis;
use std::collections::{HashMap, HashSet};

use super::error::{BillingError, BillingResult};
use crate::db::SchemaCapabilities;
use crate::db::repository::OrderRepository;

/// Payment method after normalization and downgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMethod {
    pub method: PaymentMethod,
    /// The requested method, when the backend could not store it
    pub downgraded_from: Option<PaymentMethod>,
}

/// Result of a bulk payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Orders switched to PAID by this call
    pub order_ids: Vec<String>,
    /// Orders that were already paid and left untouched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub already_paid: Vec<String>,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downgraded_from: Option<PaymentMethod>,
    /// false when the backend has no payment_method column
    pub method_recorded: bool,
}

/// Normalize method text and apply the enum downgrade
pub fn resolve_method(
    input: &str,
    caps: &SchemaCapabilities,
    default_method: PaymentMethod,
) -> BillingResult<ResolvedMethod> {
    let requested = PaymentMethod::parse(input)
        .ok_or_else(|| BillingError::InvalidPaymentMethod(input.trim().to_string()))?;

    if !caps.records_payment_method() || caps.supports_payment_method(requested) {
        return Ok(ResolvedMethod {
            method: requested,
            downgraded_from: None,
        });
    }

    tracing::warn!(
        requested = %requested,
        fallback = %default_method,
        supported = ?caps.payment_methods(),
        "Payment method not supported by backend, downgrading"
    );
    Ok(ResolvedMethod {
        method: default_method,
        downgraded_from: Some(requested),
    })
}

/// Mark orders PAID
///
/// Every id must exist in the workspace and none may be CANCELLED before
/// anything is written; orders that are already paid are skipped.
pub async fn mark_orders_paid(
    orders: &OrderRepository,
    caps: &SchemaCapabilities,
    default_method: PaymentMethod,
    workspace_id: &str,
    order_ids: &[String],
    method: &str,
) -> BillingResult<PaymentOutcome> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = order_ids
        .iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect();
    if ids.is_empty() {
        return Err(BillingError::NoOrders);
    }

    let resolved = resolve_method(method, caps, default_method)?;

    let found: HashMap<String, Order> = orders
        .find_many(workspace_id, &ids)
        .await?
        .into_iter()
        .map(|o| (o.id.clone(), o))
        .collect();
    if let Some(missing) = ids.iter().find(|id| !found.contains_key(*id)) {
        return Err(BillingError::OrderNotFound(missing.clone()));
    }
    if let Some(cancelled) = ids
        .iter()
        .find(|id| found[*id].status == OrderStatus::Cancelled)
    {
        return Err(BillingError::OrderCancelled(cancelled.clone()));
    }

    let (already_paid, to_pay): (Vec<String>, Vec<String>) =
        ids.into_iter().partition(|id| found[id].is_paid());

    let recorded = caps.records_payment_method();
    if !to_pay.is_empty() {
        let updated = orders
            .mark_paid(
                workspace_id,
                &to_pay,
                recorded.then_some(resolved.method),
                now_millis(),
            )
            .await?;
        tracing::info!(
            workspace_id,
            orders = updated.len(),
            method = %resolved.method,
            method_recorded = recorded,
            "Orders marked paid"
        );
    }

    Ok(PaymentOutcome {
        order_ids: to_pay,
        already_paid,
        method: resolved.method,
        downgraded_from: resolved.downgraded_from,
        method_recorded: recorded,
    })
}
