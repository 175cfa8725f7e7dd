//! Data models
//!
//! Shared between order-server and its clients (via API).
//! Every row carries `workspace_id`; all IDs are backend-issued strings.

pub mod category;
pub mod dining_table;
pub mod final_bill;
pub mod menu_item;
pub mod order;
pub mod service_request;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use final_bill::*;
pub use menu_item::*;
pub use order::*;
pub use service_request::*;
