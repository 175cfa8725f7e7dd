//! Bill aggregation
//!
//! The unpaid bill of a table+phone pair is built from that pair's orders:
//!
//! 1. Session boundary: the `created_at` of the most recent PAID order. Orders
//!    created at or before it belong to an earlier, settled visit.
//! 2. Keep UNPAID, non-CANCELLED orders created after the boundary.
//! 3. Aggregate their non-cancelled lines by (normalized name, unit price),
//!    skipping names listed in any order's "Unavailable items removed" reason.
//!    Lines keep first-seen order; the display name is the first spelling seen.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{BillLineItem, Order};
use shared::order::{OrderStatus, PaymentStatus};
use shared::util::normalize_name;
use std::collections::{HashMap, HashSet};

use crate::orders::money::{line_total, round_price, to_f64};

/// Aggregated, not yet persisted bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDraft {
    pub table_number: i32,
    pub customer_name: String,
    pub customer_phone: String,
    /// Constituent orders, oldest first
    pub order_ids: Vec<String>,
    pub items: Vec<BillLineItem>,
    pub total_amount: f64,
}

/// `created_at` of the most recent paid order, if any
pub fn session_boundary(orders: &[Order]) -> Option<i64> {
    orders
        .iter()
        .filter(|o| o.payment_status == PaymentStatus::Paid)
        .map(|o| o.created_at)
        .max()
}

/// Orders of the current (unpaid) billing session, oldest first
pub fn unpaid_session_orders(orders: &[Order]) -> Vec<Order> {
    let boundary = session_boundary(orders);
    let mut open: Vec<Order> = orders
        .iter()
        .filter(|o| o.payment_status == PaymentStatus::Unpaid)
        .filter(|o| o.status != OrderStatus::Cancelled)
        .filter(|o| boundary.is_none_or(|b| o.created_at > b))
        .cloned()
        .collect();
    open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    open
}

/// Aggregate the lines of a set of orders
pub fn aggregate_lines(orders: &[Order]) -> Vec<BillLineItem> {
    let suppressed: HashSet<String> = orders
        .iter()
        .flat_map(|o| o.removed_item_names())
        .map(|name| normalize_name(&name))
        .collect();

    struct Acc {
        name: String,
        unit_price: Decimal,
        quantity: i32,
        total: Decimal,
    }

    let mut lines: Vec<Acc> = Vec::new();
    let mut positions: HashMap<(String, Decimal), usize> = HashMap::new();

    for item in orders.iter().flat_map(|o| o.active_items()) {
        let name_key = item.name_key();
        if suppressed.contains(&name_key) {
            continue;
        }
        let price = round_price(item.price);
        let amount = line_total(item.price, item.quantity);
        match positions.get(&(name_key.clone(), price)) {
            Some(&idx) => {
                lines[idx].quantity += item.quantity;
                lines[idx].total += amount;
            }
            None => {
                positions.insert((name_key, price), lines.len());
                lines.push(Acc {
                    name: item.name.trim().to_string(),
                    unit_price: price,
                    quantity: item.quantity,
                    total: amount,
                });
            }
        }
    }

    lines
        .into_iter()
        .map(|acc| BillLineItem {
            name: acc.name,
            unit_price: to_f64(acc.unit_price),
            quantity: acc.quantity,
            line_total: to_f64(acc.total),
        })
        .collect()
}

/// Build the unpaid bill draft for one table+phone pair
///
/// `orders` are all orders of that pair; returns `None` when nothing is owed.
pub fn build_draft(table_number: i32, customer_phone: &str, orders: &[Order]) -> Option<BillDraft> {
    let open = unpaid_session_orders(orders);
    let items = aggregate_lines(&open);
    if items.is_empty() {
        return None;
    }

    let total: Decimal = items
        .iter()
        .map(|line| crate::orders::money::to_decimal(line.line_total))
        .sum();
    let customer_name = open
        .iter()
        .rev()
        .map(|o| o.customer_name.trim())
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string();

    Some(BillDraft {
        table_number,
        customer_name,
        customer_phone: customer_phone.to_string(),
        order_ids: open.iter().map(|o| o.id.clone()).collect(),
        items,
        total_amount: to_f64(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::money::money_eq;
    use shared::order::OrderItem;

    fn order(id: &str, created_at: i64, items: Vec<OrderItem>) -> Order {
        Order {
            id: id.into(),
            workspace_id: "ws".into(),
            table_number: 9,
            customer_name: "Arjun".into(),
            customer_phone: "9123456780".into(),
            total_amount: crate::orders::money::order_total(&items),
            items,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            status_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn item(name: &str, price: f64, qty: i32) -> OrderItem {
        OrderItem::new(None, name, price, qty)
    }

    #[test]
    fn test_aggregates_by_name_and_price() {
        let orders = vec![
            order("a", 1, vec![item("Dosa", 100.0, 1), item("Chai", 20.0, 2)]),
            order("b", 2, vec![item(" dosa ", 100.0, 2), item("Chai", 25.0, 1)]),
        ];
        let lines = aggregate_lines(&orders);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].name, "Dosa");
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].line_total, 300.0);
        assert_eq!(lines[1].name, "Chai");
        assert_eq!(lines[1].unit_price, 20.0);
        assert_eq!(lines[2].unit_price, 25.0);
    }

    #[test]
    fn test_skips_cancelled_and_removed_items() {
        let mut first = order("a", 1, vec![item("Dosa", 100.0, 1), item("Lassi", 60.0, 1)]);
        first.items[1].cancelled = true;
        first.status_reason = Some("Unavailable items removed: Lassi".into());
        let second = order("b", 2, vec![item("lassi", 60.0, 2), item("Vada", 40.0, 1)]);

        let lines = aggregate_lines(&[first, second]);
        let names: Vec<_> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Dosa", "Vada"]);
    }

    #[test]
    fn test_removed_combo_does_not_suppress_its_parts() {
        let mut first = order("a", 1, vec![item("Rice, Dal Combo", 150.0, 1), item("Papad", 20.0, 1)]);
        first.items[0].cancelled = true;
        first.items[0].cancel_reason = Some(shared::order::reason::ITEM_UNAVAILABLE.into());
        first.status_reason = Some("Unavailable items removed: Rice, Dal Combo".into());
        let second = order("b", 2, vec![item("Rice", 60.0, 2), item("Dal", 45.0, 1)]);

        let lines = aggregate_lines(&[first, second]);
        let names: Vec<_> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Papad", "Rice", "Dal"]);
        assert!(money_eq(lines.iter().map(|l| l.line_total).sum(), 185.0));
    }

    #[test]
    fn test_session_boundary_excludes_settled_orders() {
        let mut paid = order("p", 20, vec![item("Thali", 200.0, 1)]);
        paid.payment_status = PaymentStatus::Paid;
        let before = order("old", 10, vec![item("Dosa", 100.0, 1)]);
        let same_time = order("same", 20, vec![item("Idli", 30.0, 1)]);
        let after = order("new", 30, vec![item("Chai", 20.0, 1)]);

        let orders = vec![before, paid, same_time, after];
        assert_eq!(session_boundary(&orders), Some(20));
        let open: Vec<_> = unpaid_session_orders(&orders)
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(open, vec!["new"]);
    }

    #[test]
    fn test_cancelled_orders_excluded() {
        let mut cancelled = order("c", 1, vec![item("Dosa", 100.0, 1)]);
        cancelled.status = OrderStatus::Cancelled;
        let live = order("l", 2, vec![item("Chai", 20.0, 1)]);
        let draft = build_draft(9, "9123456780", &[cancelled, live]).unwrap();
        assert_eq!(draft.order_ids, vec!["l"]);
        assert_eq!(draft.total_amount, 20.0);
    }

    #[test]
    fn test_draft_total_equals_order_totals() {
        let mut a = order("a", 1, vec![item("Biryani", 220.5, 2), item("Raita", 35.25, 1)]);
        a.items[1].cancelled = true;
        a.total_amount = crate::orders::money::order_total(&a.items);
        let b = order("b", 2, vec![item("Biryani", 220.5, 1), item("Kulfi", 49.99, 3)]);
        let expected = a.total_amount + b.total_amount;

        let draft = build_draft(9, "9123456780", &[b, a]).unwrap();
        assert_eq!(draft.order_ids, vec!["a", "b"]);
        assert!(money_eq(draft.total_amount, expected));
        let sum: f64 = draft.items.iter().map(|l| l.line_total).sum();
        assert!(money_eq(sum, draft.total_amount));
    }

    #[test]
    fn test_nothing_owed() {
        let mut paid = order("p", 1, vec![item("Dosa", 100.0, 1)]);
        paid.payment_status = PaymentStatus::Paid;
        assert!(build_draft(9, "9123456780", &[paid]).is_none());
        assert!(build_draft(9, "9123456780", &[]).is_none());
    }
}
