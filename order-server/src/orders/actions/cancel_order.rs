//! CancelOrder action (customer)
//!
//! A customer may cancel an order only while it is PENDING, and only from the
//! table+phone that placed it.

use shared::models::Order;
use shared::order::OrderStatus;
use shared::order::reason::CUSTOMER_CANCELLED;

use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction, OrderError, OrderResult};

#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub table_number: i32,
    pub customer_phone: String,
}

impl OrderAction for CancelOrderAction {
    fn apply(&self, order: &mut Order, ctx: &ActionContext) -> OrderResult<ActionOutcome> {
        if !order.belongs_to(self.table_number, &self.customer_phone) {
            return Err(OrderError::NotOwner(order.id.clone()));
        }
        if order.is_paid() {
            return Err(OrderError::OrderAlreadyPaid(order.id.clone()));
        }
        order.status.check_transition(OrderStatus::Cancelled, ctx.actor)?;

        order.status = OrderStatus::Cancelled;
        order.status_reason = Some(CUSTOMER_CANCELLED.to_string());
        order.updated_at = ctx.now;
        Ok(ActionOutcome::Updated)
    }
}
