//! Order status state machine
//!
//! ```text
//! PENDING ──▶ PREPARING ──▶ READY ──▶ COMPLETED
//!    │            │           │
//!    └────────────┴───────────┴──────▶ CANCELLED
//! ```
//!
//! Forward steps are kitchen-driven and never skip or reverse. A customer may
//! cancel only while the order is still PENDING; an admin (reject out of stock)
//! or the system (availability reconciliation) may cancel any non-terminal order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

/// Who is asking for a status change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    /// 扫码点餐的顾客
    Customer,
    /// 后厨
    Kitchen,
    /// 管理员
    Admin,
    /// 系统自动处理 (库存对账)
    System,
}

/// Rejected status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("order is already {0} and cannot change")]
    Terminal(OrderStatus),

    #[error("cannot move order from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },

    #[error("{actor} cannot move order from {from} to {to}")]
    ActorNotPermitted {
        actor: Actor,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// COMPLETED and CANCELLED accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Still in the kitchen pipeline
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// The single forward successor on the kitchen path
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    /// Check a transition against the lifecycle rules
    pub fn check_transition(self, to: OrderStatus, actor: Actor) -> Result<(), TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }

        let permitted = match to {
            OrderStatus::Cancelled => match actor {
                Actor::Customer => self == OrderStatus::Pending,
                Actor::Admin | Actor::System => true,
                Actor::Kitchen => false,
            },
            _ => {
                if self.next() != Some(to) {
                    return Err(TransitionError::NotAllowed { from: self, to });
                }
                matches!(actor, Actor::Kitchen | Actor::Admin)
            }
        };

        if permitted {
            Ok(())
        } else {
            Err(TransitionError::ActorNotPermitted {
                actor,
                from: self,
                to,
            })
        }
    }

    /// Convenience wrapper over [`OrderStatus::check_transition`]
    pub fn can_transition_to(self, to: OrderStatus, actor: Actor) -> bool {
        self.check_transition(to, actor).is_ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Actor::Customer => "customer",
            Actor::Kitchen => "kitchen",
            Actor::Admin => "admin",
            Actor::System => "system",
        };
        f.write_str(s)
    }
}
