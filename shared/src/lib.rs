//! Shared types for the table-side ordering platform
//!
//! Common types used by order-server and its clients: domain models, the
//! order lifecycle rules, unified error types, change notifications and
//! request-scoped session objects.

pub mod error;
pub mod message;
pub mod models;
pub mod order;
pub mod session;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{ChangeAction, ChangeEvent, ChangeFilter, Resource};
pub use session::{CustomerSession, StaffRole, StaffSession};
