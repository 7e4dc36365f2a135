use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::error::{AppError, Result};

/// Convert a major-unit amount (e.g. MYR 1.00) into provider minor units
/// (cents). Midpoints round away from zero, so 0.005 becomes 1 cent.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "Payment amount must not be negative: {}",
            amount
        )));
    }

    (amount * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| {
            AppError::validation(format!("Payment amount out of range: {}", amount))
        })
}
