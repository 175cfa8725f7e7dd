//! Billing errors

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::RepoError;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    #[error("Bill already paid: {0}")]
    BillAlreadyPaid(String),

    #[error("No unpaid orders for table {table_number}")]
    BillEmpty { table_number: i32 },

    #[error("Unrecognized payment method: {0:?}")]
    InvalidPaymentMethod(String),

    #[error("No order ids given")]
    NoOrders,

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order is cancelled and cannot be paid: {0}")]
    OrderCancelled(String),

    #[error("Bill {bill_id} no longer matches the open orders of its table")]
    BillStale { bill_id: String },

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Rejected(#[from] AppError),
}

pub type BillingResult<T> = Result<T, BillingError>;

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::BillNotFound(id) => {
                AppError::new(ErrorCode::BillNotFound).with_detail("bill_id", id)
            }
            BillingError::BillAlreadyPaid(id) => {
                AppError::new(ErrorCode::BillAlreadyPaid).with_detail("bill_id", id)
            }
            BillingError::BillEmpty { table_number } => {
                AppError::new(ErrorCode::BillEmpty).with_detail("table_number", table_number)
            }
            BillingError::InvalidPaymentMethod(input) => {
                AppError::with_message(
                    ErrorCode::PaymentInvalidMethod,
                    format!("Unrecognized payment method: {}", input),
                )
                .with_detail("payment_method", input)
            }
            BillingError::NoOrders => {
                AppError::validation("At least one order id is required")
                    .with_detail("field", "order_ids")
            }
            BillingError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            BillingError::OrderCancelled(id) => {
                AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("order_id", id)
            }
            BillingError::BillStale { bill_id } => {
                AppError::new(ErrorCode::BillStale).with_detail("bill_id", bill_id)
            }
            BillingError::Repo(e) => e.into(),
            BillingError::Rejected(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: AppError = BillingError::BillEmpty { table_number: 3 }.into();
        assert_eq!(err.code, ErrorCode::BillEmpty);

        let err: AppError = BillingError::InvalidPaymentMethod("barter".into()).into();
        assert_eq!(err.code, ErrorCode::PaymentInvalidMethod);

        let err: AppError = BillingError::NoOrders.into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err: AppError = BillingError::OrderCancelled("o-9".into()).into();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err: AppError = BillingError::BillStale { bill_id: "b-1".into() }.into();
        assert_eq!(err.code, ErrorCode::BillStale);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        assert_eq!(err.details.as_ref().unwrap()["bill_id"], "b-1");

        let err: AppError = BillingError::Repo(RepoError::NotFound("x".into())).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
