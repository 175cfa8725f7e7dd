//! Order action implementations
//!
//! Each action implements [`OrderAction`](crate::orders::traits::OrderAction)
//! and handles one kind of mutation.

mod cancel_order;
mod reject_order;
mod remove_unavailable;
mod update_status;

pub use cancel_order::CancelOrderAction;
pub use reject_order::RejectOrderAction;
pub use remove_unavailable::{AvailabilityIndex, RemoveUnavailableAction};
pub use update_status::UpdateStatusAction;
