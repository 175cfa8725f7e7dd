//! UpdateStatus action
//!
//! Moves an order along the kitchen path (PENDING → PREPARING → READY →
//! COMPLETED). Targets are checked by the state machine, so skips, reversals
//! and changes to terminal orders are rejected.

use shared::models::Order;
use shared::order::{OrderStatus, TransitionError};

use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction, OrderError, OrderResult};

#[derive(Debug, Clone)]
pub struct UpdateStatusAction {
    pub target: OrderStatus,
}

impl UpdateStatusAction {
    /// One step forward from the current status
    pub fn advance(order: &Order) -> OrderResult<Self> {
        let target = order
            .status
            .next()
            .ok_or(OrderError::Transition(TransitionError::Terminal(order.status)))?;
        Ok(Self { target })
    }
}

impl OrderAction for UpdateStatusAction {
    fn apply(&self, order: &mut Order, ctx: &ActionContext) -> OrderResult<ActionOutcome> {
        order.status.check_transition(self.target, ctx.actor)?;
        order.status = self.target;
        order.updated_at = ctx.now;
        Ok(ActionOutcome::Updated)
    }
}
