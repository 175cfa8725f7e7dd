//! RejectOrder action (admin, "out of stock")
//!
//! Cancels any non-terminal order that has not been paid.

use shared::models::Order;
use shared::order::OrderStatus;
use shared::order::reason::rejection_reason;

use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction, OrderError, OrderResult};

#[derive(Debug, Clone, Default)]
pub struct RejectOrderAction {
    pub note: Option<String>,
}

impl OrderAction for RejectOrderAction {
    fn apply(&self, order: &mut Order, ctx: &ActionContext) -> OrderResult<ActionOutcome> {
        if order.is_paid() {
            return Err(OrderError::OrderAlreadyPaid(order.id.clone()));
        }
        order.status.check_transition(OrderStatus::Cancelled, ctx.actor)?;

        order.status = OrderStatus::Cancelled;
        order.status_reason = Some(rejection_reason(self.note.as_deref()));
        order.updated_at = ctx.now;
        Ok(ActionOutcome::Updated)
    }
}
