//! OrdersManager - order placement and lifecycle
//!
//! # Command Flow
//!
//! ```text
//! operation(session, order_id, ..)
//!     ├─ 1. Check the session (customer identity / staff role)
//!     ├─ 2. Load the order inside the session's workspace
//!     ├─ 3. Run the action (pure mutation, state machine checked)
//!     ├─ 4. Persist when the action reports Updated
//!     └─ 5. Store publishes the change on the feed
//! ```

use serde::{Deserialize, Serialize};
use shared::models::{DiningTable, Order, OrderFilter};
use shared::order::{Actor, OrderItem, OrderItemInput, OrderStatus, PaymentStatus};
use shared::session::{CustomerSession, StaffRole, StaffSession};
use shared::util::{new_id, now_millis};
use std::collections::HashMap;

use super::actions::{
    AvailabilityIndex, CancelOrderAction, RejectOrderAction, RemoveUnavailableAction,
    UpdateStatusAction,
};
use super::money::{order_total, validate_price, validate_quantity};
use super::traits::{ActionContext, ActionOutcome, OrderAction, OrderError, OrderResult};
use crate::db::DbService;
use crate::db::repository::{DiningTableRepository, MenuItemRepository, OrderRepository};

/// Maximum distinct lines per order
const MAX_LINES_PER_ORDER: usize = 50;

/// Customer order submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemInput>,
}

/// Result of reconciling a workspace against menu availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Orders that lost at least one line
    pub orders_updated: usize,
    /// Of those, orders left with nothing and cancelled
    pub orders_cancelled: usize,
}

#[derive(Debug, Clone)]
pub struct OrdersManager {
    orders: OrderRepository,
    menu: MenuItemRepository,
    tables: DiningTableRepository,
}

impl OrdersManager {
    pub fn new(db: DbService) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            menu: MenuItemRepository::new(db.clone()),
            tables: DiningTableRepository::new(db),
        }
    }

    pub fn repository(&self) -> &OrderRepository {
        &self.orders
    }

    // ========================================================================
    // Customer
    // ========================================================================

    /// Place a new PENDING/UNPAID order
    ///
    /// Prices and names come from the menu, never from the client.
    pub async fn place_order(
        &self,
        session: &CustomerSession,
        request: PlaceOrderRequest,
    ) -> OrderResult<Order> {
        session.require_identity()?;
        if request.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if request.items.len() > MAX_LINES_PER_ORDER {
            return Err(OrderError::InvalidQuantity {
                name: "order lines".into(),
                quantity: i32::try_from(request.items.len()).unwrap_or(i32::MAX),
            });
        }

        self.require_open_table(&session.workspace_id, session.table_number)
            .await?;

        let ids: Vec<String> = request
            .items
            .iter()
            .map(|i| i.menu_item_id.clone())
            .collect();
        let menu: HashMap<String, _> = self
            .menu
            .find_many(&session.workspace_id, &ids)
            .await?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let mut items = Vec::with_capacity(request.items.len());
        for input in &request.items {
            let menu_item = menu
                .get(&input.menu_item_id)
                .ok_or_else(|| OrderError::MenuItemNotFound(input.menu_item_id.clone()))?;
            if !menu_item.is_available {
                return Err(OrderError::MenuItemUnavailable(menu_item.name.clone()));
            }
            validate_quantity(input.quantity, &menu_item.name)?;
            validate_price(menu_item.price, &menu_item.name)?;
            items.push(OrderItem::new(
                Some(menu_item.id.clone()),
                menu_item.name.clone(),
                menu_item.price,
                input.quantity,
            ));
        }

        let now = now_millis();
        let order = Order {
            id: new_id(),
            workspace_id: session.workspace_id.clone(),
            table_number: session.table_number,
            customer_name: session.customer_name.clone(),
            customer_phone: session.customer_phone.clone(),
            total_amount: order_total(&items),
            items,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            status_reason: None,
            created_at: now,
            updated_at: now,
        };

        let order = self.orders.create(&order).await?;
        tracing::info!(
            workspace_id = %order.workspace_id,
            order_id = %order.id,
            table_number = order.table_number,
            total = order.total_amount,
            "Order placed"
        );
        Ok(order)
    }

    /// Orders placed from this table by this phone, oldest first
    pub async fn list_for_customer(&self, session: &CustomerSession) -> OrderResult<Vec<Order>> {
        Ok(self
            .orders
            .find_for_customer(
                &session.workspace_id,
                session.table_number,
                &session.customer_phone,
            )
            .await?)
    }

    /// Customer cancellation (PENDING only, own orders only)
    pub async fn cancel_order(&self, session: &CustomerSession, order_id: &str) -> OrderResult<Order> {
        let action = CancelOrderAction {
            table_number: session.table_number,
            customer_phone: session.customer_phone.clone(),
        };
        self.execute(&session.workspace_id, order_id, Actor::Customer, &action)
            .await
    }

    // ========================================================================
    // Kitchen / admin
    // ========================================================================

    /// Active orders (PENDING / PREPARING / READY), oldest first
    pub async fn kitchen_queue(&self, staff: &StaffSession) -> OrderResult<Vec<Order>> {
        Ok(self.orders.find_active(&staff.workspace_id).await?)
    }

    /// Move an order one step along the kitchen path
    pub async fn advance_status(&self, staff: &StaffSession, order_id: &str) -> OrderResult<Order> {
        let order = self.load(&staff.workspace_id, order_id).await?;
        let action = UpdateStatusAction::advance(&order)?;
        self.apply_and_save(order, staff_actor(staff), &action)
            .await
    }

    /// Move an order to an explicit status
    ///
    /// CANCELLED is routed through [`reject_order`](Self::reject_order), so it
    /// needs an admin session.
    pub async fn update_status(
        &self,
        staff: &StaffSession,
        order_id: &str,
        target: OrderStatus,
    ) -> OrderResult<Order> {
        if target == OrderStatus::Cancelled && staff.is_admin() {
            return self.reject_order(staff, order_id, None).await;
        }
        let action = UpdateStatusAction { target };
        self.execute(&staff.workspace_id, order_id, staff_actor(staff), &action)
            .await
    }

    /// Admin rejection ("out of stock") of an unpaid, non-terminal order
    pub async fn reject_order(
        &self,
        staff: &StaffSession,
        order_id: &str,
        note: Option<String>,
    ) -> OrderResult<Order> {
        staff.require_admin()?;
        let action = RejectOrderAction { note };
        self.execute(&staff.workspace_id, order_id, Actor::Admin, &action)
            .await
    }

    /// Admin listing with filters, newest first
    pub async fn list(&self, staff: &StaffSession, filter: &OrderFilter) -> OrderResult<Vec<Order>> {
        staff.require_admin()?;
        Ok(self.orders.list(&staff.workspace_id, filter).await?)
    }

    pub async fn get(&self, staff: &StaffSession, order_id: &str) -> OrderResult<Order> {
        self.load(&staff.workspace_id, order_id).await
    }

    // ========================================================================
    // Availability reconciliation
    // ========================================================================

    /// Reconcile one order against the current menu
    pub async fn reconcile_order(&self, staff: &StaffSession, order_id: &str) -> OrderResult<Order> {
        staff.require_admin()?;
        let menu = self.menu.find_all(&staff.workspace_id).await?;
        let index = AvailabilityIndex::from_menu(&menu);
        let action = RemoveUnavailableAction { index: &index };
        self.execute(&staff.workspace_id, order_id, Actor::System, &action)
            .await
    }

    /// Reconcile every non-terminal unpaid order of a workspace
    pub async fn reconcile_workspace(&self, workspace_id: &str) -> OrderResult<ReconcileSummary> {
        let menu = self.menu.find_all(workspace_id).await?;
        let index = AvailabilityIndex::from_menu(&menu);
        let action = RemoveUnavailableAction { index: &index };
        let ctx = ActionContext::new(Actor::System, now_millis());

        let mut summary = ReconcileSummary::default();
        for mut order in self.orders.find_reconcilable(workspace_id).await? {
            if action.apply(&mut order, &ctx)? == ActionOutcome::Unchanged {
                continue;
            }
            self.orders.save(&order).await?;
            summary.orders_updated += 1;
            if order.status == OrderStatus::Cancelled {
                summary.orders_cancelled += 1;
            }
        }

        if summary.orders_updated > 0 {
            tracing::info!(
                workspace_id,
                orders_updated = summary.orders_updated,
                orders_cancelled = summary.orders_cancelled,
                "Availability reconciliation finished"
            );
        }
        Ok(summary)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn load(&self, workspace_id: &str, order_id: &str) -> OrderResult<Order> {
        self.orders
            .find_by_id(workspace_id, order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    async fn execute(
        &self,
        workspace_id: &str,
        order_id: &str,
        actor: Actor,
        action: &(dyn OrderAction + Sync),
    ) -> OrderResult<Order> {
        let order = self.load(workspace_id, order_id).await?;
        self.apply_and_save(order, actor, action).await
    }

    async fn apply_and_save(
        &self,
        mut order: Order,
        actor: Actor,
        action: &(dyn OrderAction + Sync),
    ) -> OrderResult<Order> {
        let from = order.status;
        let ctx = ActionContext::new(actor, now_millis());
        match action.apply(&mut order, &ctx)? {
            ActionOutcome::Unchanged => Ok(order),
            ActionOutcome::Updated => {
                let saved = self.orders.save(&order).await?;
                tracing::info!(
                    order_id = %saved.id,
                    %actor,
                    from = %from,
                    to = %saved.status,
                    "Order updated"
                );
                Ok(saved)
            }
        }
    }

    async fn require_open_table(&self, workspace_id: &str, table_number: i32) -> OrderResult<DiningTable> {
        let table = self
            .tables
            .find_by_number(workspace_id, table_number)
            .await?
            .ok_or(OrderError::TableNotFound(table_number))?;
        if !table.is_active {
            return Err(OrderError::TableInactive(table_number));
        }
        Ok(table)
    }
}

fn staff_actor(staff: &StaffSession) -> Actor {
    match staff.role {
        StaffRole::Kitchen => Actor::Kitchen,
        StaffRole::Admin => Actor::Admin,
    }
}
