//! Order lifecycle module
//!
//! - **manager**: placement, status changes, cancellation, rejection, reconciliation
//! - **actions**: one pure mutation per operation, checked by the state machine
//! - **money**: decimal arithmetic for totals
//!
//! # Architecture
//!
//! ```text
//! HTTP handler ──▶ OrdersManager ──▶ OrderAction::apply(&mut Order)
//!                       │                      │
//!                       └──── OrderRepository ◀┘ (save when Updated)
//!                                   │
//!                              ChangeFeed ──▶ subscribers
//! ```

pub mod actions;
pub mod manager;
pub mod money;
pub mod traits;

// Re-exports
pub use actions::AvailabilityIndex;
pub use manager::{OrdersManager, PlaceOrderRequest, ReconcileSummary};
pub use traits::{OrderError, OrderResult};

// Re-export shared types for convenience
pub use shared::order::{Actor, OrderStatus, PaymentMethod, PaymentStatus};
