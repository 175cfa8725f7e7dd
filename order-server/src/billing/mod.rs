//! Billing module
//!
//! - **aggregate**: session boundary and line aggregation (pure)
//! - **payment**: method normalization, enum downgrade, bulk PAID marking
//! - **service**: final bill generation and payment

pub mod aggregate;
pub mod error;
pub mod payment;
pub mod service;

pub use aggregate::{BillDraft, aggregate_lines, build_draft, session_boundary, unpaid_session_orders};
pub use error::{BillingError, BillingResult};
pub use payment::{PaymentOutcome, ResolvedMethod, mark_orders_paid, resolve_method};
pub use service::{BillingService, PaidBill};
