//! Order action contract and errors
//!
//! An action is a pure mutation of one loaded [`Order`]: the manager loads the
//! row, runs the action, and persists the result only when the action reports
//! [`ActionOutcome::Updated`].

use shared::error::{AppError, ErrorCode};
use shared::models::Order;
use shared::order::{Actor, OrderStatus, TransitionError};
use thiserror::Error;

use crate::db::RepoError;

/// Order errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already paid: {0}")]
    OrderAlreadyPaid(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Order {0} does not belong to this table session")]
    NotOwner(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Menu item unavailable: {0}")]
    MenuItemUnavailable(String),

    #[error("Invalid quantity {quantity} for {name}")]
    InvalidQuantity { name: String, quantity: i32 },

    #[error("Invalid price {price} for {name}")]
    InvalidPrice { name: String, price: f64 },

    #[error("Table not found: {0}")]
    TableNotFound(i32),

    #[error("Table is inactive: {0}")]
    TableInactive(i32),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Rejected(#[from] AppError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            OrderError::OrderAlreadyPaid(id) => {
                AppError::new(ErrorCode::OrderAlreadyPaid).with_detail("order_id", id)
            }
            OrderError::Transition(e) => transition_error(e),
            OrderError::NotOwner(id) => AppError::permission_denied(format!(
                "Order {} was not placed from this table session",
                id
            )),
            OrderError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            OrderError::MenuItemNotFound(id) => {
                AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_item_id", id)
            }
            OrderError::MenuItemUnavailable(name) => {
                AppError::with_message(ErrorCode::MenuItemUnavailable, format!("{} is unavailable", name))
                    .with_detail("name", name)
            }
            OrderError::InvalidQuantity { name, quantity } => AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Quantity for {} must be between 1 and 99", name),
            )
            .with_detail("quantity", quantity),
            OrderError::InvalidPrice { name, price } => {
                AppError::new(ErrorCode::MenuItemInvalidPrice)
                    .with_detail("name", name)
                    .with_detail("price", price)
            }
            OrderError::TableNotFound(n) => {
                AppError::new(ErrorCode::TableNotFound).with_detail("table_number", n)
            }
            OrderError::TableInactive(n) => {
                AppError::new(ErrorCode::TableInactive).with_detail("table_number", n)
            }
            OrderError::Repo(e) => e.into(),
            OrderError::Rejected(e) => e,
        }
    }
}

fn transition_error(err: TransitionError) -> AppError {
    match err {
        TransitionError::Terminal(OrderStatus::Completed) => {
            AppError::new(ErrorCode::OrderAlreadyCompleted)
        }
        TransitionError::Terminal(_) => AppError::new(ErrorCode::OrderAlreadyCancelled),
        TransitionError::NotAllowed { from, to } => {
            AppError::with_message(ErrorCode::InvalidStatusTransition, err.to_string())
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str())
        }
        TransitionError::ActorNotPermitted { actor, from, to } => {
            let code = if to == OrderStatus::Cancelled && actor == Actor::Customer {
                ErrorCode::CancellationNotAllowed
            } else {
                ErrorCode::InvalidStatusTransition
            };
            AppError::with_message(code, err.to_string())
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str())
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Who is acting and when
#[derive(Debug, Clone, Copy)]
pub struct ActionContext {
    pub actor: Actor,
    pub now: i64,
}

impl ActionContext {
    pub fn new(actor: Actor, now: i64) -> Self {
        Self { actor, now }
    }
}

/// Whether the action changed the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Updated,
    Unchanged,
}

/// A single order mutation
pub trait OrderAction {
    fn apply(&self, order: &mut Order, ctx: &ActionContext) -> OrderResult<ActionOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_cancel_maps_to_cancellation_not_allowed() {
        let err = OrderError::Transition(TransitionError::ActorNotPermitted {
            actor: Actor::Customer,
            from: OrderStatus::Preparing,
            to: OrderStatus::Cancelled,
        });
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CancellationNotAllowed);
    }

    #[test]
    fn test_terminal_maps_to_specific_codes() {
        let app: AppError = OrderError::Transition(TransitionError::Terminal(OrderStatus::Completed)).into();
        assert_eq!(app.code, ErrorCode::OrderAlreadyCompleted);
        let app: AppError = OrderError::Transition(TransitionError::Terminal(OrderStatus::Cancelled)).into();
        assert_eq!(app.code, ErrorCode::OrderAlreadyCancelled);
    }

    #[test]
    fn test_repo_errors_pass_through() {
        let app: AppError = OrderError::Repo(RepoError::SchemaMismatch("x".into())).into();
        assert_eq!(app.code, ErrorCode::SchemaMismatch);
    }
}
