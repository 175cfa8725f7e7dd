//! RemoveUnavailable action (availability reconciliation)
//!
//! When a menu item becomes unavailable after an order was placed, the order's
//! matching lines are marked cancelled, the total is recomputed over what is
//! left, and an order with nothing left is CANCELLED.
//!
//! Lines are matched by `menu_item_id`; when the id is absent or no longer on
//! the menu, the normalized item name is used instead. The status reason
//! becomes `"Unavailable items removed: X, Y"`, merged with names removed by
//! earlier passes. Bill aggregation suppresses the same names, read back from
//! the lines marked "Item unavailable".

use shared::models::{MenuItem, Order};
use shared::order::OrderStatus;
use shared::order::reason::{ITEM_UNAVAILABLE, format_removed_items};
use shared::util::normalize_name;
use std::collections::HashMap;

use crate::orders::money::order_total;
use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction, OrderResult};

/// Snapshot of menu availability, keyed by id and by normalized name
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_id: HashMap<String, bool>,
    /// true if at least one menu entry with this name is available
    by_name: HashMap<String, bool>,
}

impl AvailabilityIndex {
    pub fn from_menu<'a>(items: impl IntoIterator<Item = &'a MenuItem>) -> Self {
        let mut index = Self::default();
        for item in items {
            index.by_id.insert(item.id.clone(), item.is_available);
            let entry = index.by_name.entry(normalize_name(&item.name)).or_insert(false);
            *entry |= item.is_available;
        }
        index
    }

    /// Whether a line refers to a menu item that is now unavailable
    ///
    /// Lines matching nothing on the menu are left alone.
    pub fn is_unavailable(&self, menu_item_id: Option<&str>, name: &str) -> bool {
        if let Some(available) = menu_item_id.and_then(|id| self.by_id.get(id)) {
            return !available;
        }
        self.by_name
            .get(&normalize_name(name))
            .is_some_and(|available| !available)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveUnavailableAction<'a> {
    pub index: &'a AvailabilityIndex,
}

impl OrderAction for RemoveUnavailableAction<'_> {
    fn apply(&self, order: &mut Order, ctx: &ActionContext) -> OrderResult<ActionOutcome> {
        if order.status.is_terminal() || order.is_paid() {
            return Ok(ActionOutcome::Unchanged);
        }

        let mut removed_any = false;
        for item in order.items.iter_mut().filter(|item| !item.cancelled) {
            if self
                .index
                .is_unavailable(item.menu_item_id.as_deref(), &item.name)
            {
                item.cancelled = true;
                item.cancel_reason = Some(ITEM_UNAVAILABLE.to_string());
                removed_any = true;
            }
        }
        if !removed_any {
            return Ok(ActionOutcome::Unchanged);
        }

        let names = order.removed_item_names();
        order.total_amount = order_total(&order.items);
        order.status_reason = Some(format_removed_items(&names));
        if order.active_items().next().is_none() {
            order.status.check_transition(OrderStatus::Cancelled, ctx.actor)?;
            order.status = OrderStatus::Cancelled;
        }
        order.updated_at = ctx.now;

        tracing::info!(
            order_id = %order.id,
            removed = ?names,
            total = order.total_amount,
            status = %order.status,
            "Unavailable items removed from order"
        );
        Ok(ActionOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::test_support::{menu_item, order_with_items};
    use crate::orders::money::money_eq;
    use shared::order::{Actor, OrderItem, PaymentStatus};

    fn ctx() -> ActionContext {
        ActionContext::new(Actor::System, 99)
    }

    #[test]
    fn test_removes_unavailable_line_and_recomputes_total() {
        let mut order = order_with_items(&[("Paneer Tikka", 250.0, 2), ("Lassi", 60.0, 1)]);
        let menu = vec![
            menu_item("m-paneer-tikka", "Paneer Tikka", 250.0, false),
            menu_item("m-lassi", "Lassi", 60.0, true),
        ];
        let index = AvailabilityIndex::from_menu(&menu);

        let outcome = RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Updated);
        assert!(order.items[0].cancelled);
        assert_eq!(order.items[0].cancel_reason.as_deref(), Some("Item unavailable"));
        assert!(!order.items[1].cancelled);
        assert!(money_eq(order.total_amount, 60.0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            order.status_reason.as_deref(),
            Some("Unavailable items removed: Paneer Tikka")
        );
    }

    #[test]
    fn test_all_items_removed_cancels_order() {
        let mut order = order_with_items(&[("Lassi", 60.0, 2)]);
        order.status = OrderStatus::Preparing;
        let menu = vec![menu_item("m-lassi", "Lassi", 60.0, false)];
        let index = AvailabilityIndex::from_menu(&menu);

        RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.total_amount, 0.0);
    }

    #[test]
    fn test_name_fallback_for_legacy_lines() {
        let mut order = order_with_items(&[("Dosa", 100.0, 1)]);
        order.items.push(OrderItem::new(None, "  masala   CHAI ", 30.0, 2));
        order.items.push(OrderItem::new(Some("deleted-id".into()), "Masala Chai", 30.0, 1));
        order.total_amount = 190.0;
        let menu = vec![
            menu_item("m-dosa", "Dosa", 100.0, true),
            menu_item("m-chai", "Masala Chai", 30.0, false),
        ];
        let index = AvailabilityIndex::from_menu(&menu);

        RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();

        assert!(order.items[1].cancelled);
        assert!(order.items[2].cancelled);
        assert!(money_eq(order.total_amount, 100.0));
        // Same item under two spellings is listed once
        assert_eq!(
            order.status_reason.as_deref(),
            Some("Unavailable items removed: masala   CHAI")
        );
    }

    #[test]
    fn test_merges_with_previously_removed_names() {
        let mut order = order_with_items(&[("Dosa", 100.0, 1), ("Vada", 40.0, 1), ("Idli", 30.0, 1)]);
        let mut menu = vec![
            menu_item("m-dosa", "Dosa", 100.0, true),
            menu_item("m-vada", "Vada", 40.0, false),
            menu_item("m-idli", "Idli", 30.0, true),
        ];

        let index = AvailabilityIndex::from_menu(&menu);
        RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();

        menu[2].is_available = false;
        let index = AvailabilityIndex::from_menu(&menu);
        RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();

        assert_eq!(
            order.status_reason.as_deref(),
            Some("Unavailable items removed: Vada, Idli")
        );
        assert!(money_eq(order.total_amount, 100.0));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_comma_in_item_name_is_kept_whole() {
        let mut order = order_with_items(&[("Rice, Dal Combo", 150.0, 1), ("Rice", 60.0, 1)]);
        let menu = vec![
            menu_item("m-combo", "Rice, Dal Combo", 150.0, false),
            menu_item("m-rice", "Rice", 60.0, true),
        ];
        let index = AvailabilityIndex::from_menu(&menu);
        RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();

        assert_eq!(order.removed_item_names(), vec!["Rice, Dal Combo"]);
        assert!(!order.items[1].cancelled);
        assert!(money_eq(order.total_amount, 60.0));
    }

    #[test]
    fn test_nothing_to_remove_is_unchanged() {
        let mut order = order_with_items(&[("Dosa", 100.0, 1)]);
        let before = order.clone();
        let menu = vec![menu_item("m-dosa", "Dosa", 100.0, true)];
        let index = AvailabilityIndex::from_menu(&menu);
        let outcome = RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();
        assert_eq!(outcome, ActionOutcome::Unchanged);
        assert_eq!(order, before);
    }

    #[test]
    fn test_paid_and_terminal_orders_are_skipped() {
        let menu = vec![menu_item("m-dosa", "Dosa", 100.0, false)];
        let index = AvailabilityIndex::from_menu(&menu);

        let mut paid = order_with_items(&[("Dosa", 100.0, 1)]);
        paid.payment_status = PaymentStatus::Paid;
        let mut done = order_with_items(&[("Dosa", 100.0, 1)]);
        done.status = OrderStatus::Completed;

        for order in [&mut paid, &mut done] {
            let outcome = RemoveUnavailableAction { index: &index }
                .apply(order, &ctx())
                .unwrap();
            assert_eq!(outcome, ActionOutcome::Unchanged);
            assert!(!order.items[0].cancelled);
        }
    }

    #[test]
    fn test_total_matches_remaining_lines() {
        let mut order = order_with_items(&[
            ("Biryani", 220.5, 3),
            ("Raita", 35.25, 2),
            ("Gulab Jamun", 49.99, 4),
        ]);
        let menu = vec![
            menu_item("m-biryani", "Biryani", 220.5, true),
            menu_item("m-raita", "Raita", 35.25, false),
            menu_item("m-gulab-jamun", "Gulab Jamun", 49.99, true),
        ];
        let index = AvailabilityIndex::from_menu(&menu);
        RemoveUnavailableAction { index: &index }
            .apply(&mut order, &ctx())
            .unwrap();
        assert!(money_eq(order.total_amount, order_total(&order.items)));
        assert!(money_eq(order.total_amount, 220.5 * 3.0 + 49.99 * 4.0));
    }
}
