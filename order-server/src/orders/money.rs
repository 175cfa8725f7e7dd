//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use shared::order::OrderItem;

use super::traits::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum quantity per line
pub const MAX_QUANTITY: i32 = 99;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a price to cents; used as part of the bill aggregation key
pub fn round_price(value: f64) -> Decimal {
    to_decimal(value).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// price × quantity
pub fn line_total(price: f64, quantity: i32) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Sum of non-cancelled line totals
pub fn order_total<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> f64 {
    let total: Decimal = items
        .into_iter()
        .filter(|item| !item.cancelled)
        .map(|item| line_total(item.price, item.quantity))
        .sum();
    to_f64(total)
}

/// Compare two amounts within [`MONEY_TOLERANCE`]
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}

/// Validate a menu price snapshot
pub fn validate_price(price: f64, name: &str) -> Result<(), OrderError> {
    if !price.is_finite() || price < 0.0 || price > MAX_PRICE {
        return Err(OrderError::InvalidPrice {
            name: name.to_string(),
            price,
        });
    }
    Ok(())
}

/// Validate a requested quantity (1..=99)
pub fn validate_quantity(quantity: i32, name: &str) -> Result<(), OrderError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(OrderError::InvalidQuantity {
            name: name.to_string(),
            quantity,
        });
    }
    Ok(())
}
