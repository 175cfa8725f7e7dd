//! Services Module
//!
//! Thin, tenant-scoped services around the repositories:
//! menu and categories, dining tables, service requests.

pub mod menu;
pub mod service_requests;
pub mod tables;

pub use menu::{AvailabilityChange, IMAGE_BUCKET, MenuService, MenuView};
pub use service_requests::ServiceRequestService;
pub use tables::TableService;
