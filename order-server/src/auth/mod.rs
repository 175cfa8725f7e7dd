//! 会话模块
//!
//! Request-scoped sessions built from headers:
//! - [`CurrentWorkspace`] - tenant only (`X-Workspace-Id`)
//! - [`CurrentCustomer`] - table session (`X-Table-Number`, `X-Customer-Name`, `X-Customer-Phone`)
//! - [`CurrentStaff`] - kitchen / admin session (`X-Staff-Role`)

pub mod extractor;

pub use extractor::{CurrentCustomer, CurrentStaff, CurrentWorkspace};
