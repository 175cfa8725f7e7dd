//! Order domain rules
//!
//! This module provides the rules shared by the server and its clients:
//! - Status: the order lifecycle state machine
//! - Types: line items and payment values
//! - Reason: status reason texts (including the removed-items suppression list)

pub mod reason;
pub mod status;
pub mod types;

// Re-exports
pub use status::{Actor, OrderStatus, TransitionError};
pub use types::*;
