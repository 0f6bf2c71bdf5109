//! Integer money arithmetic.
//!
//! Every product is truncated toward zero so that no computed amount can
//! exceed the statutory schedule. Overflow is reported, never wrapped.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{EngineError, EngineResult};
use crate::models::Amount;

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{what} is out of range"),
    }
}

/// Returns `amount × rate`, truncated toward zero.
pub(crate) fn apply_rate(amount: Amount, rate: Decimal) -> EngineResult<Amount> {
    Decimal::from(amount)
        .checked_mul(rate)
        .and_then(|product| product.trunc().to_i64())
        .ok_or_else(|| overflow("rated amount"))
}

/// Returns true if the exact product `amount × rate` is at or below `limit`.
///
/// The product is compared before truncation, so a fractional excess over
/// `limit` still counts as above it.
pub(crate) fn rated_at_most(amount: Amount, rate: Decimal, limit: Amount) -> EngineResult<bool> {
    Decimal::from(amount)
        .checked_mul(rate)
        .map(|product| product <= Decimal::from(limit))
        .ok_or_else(|| overflow("rated amount"))
}

/// Returns `amount × numerator / denominator`, truncated toward zero.
pub(crate) fn apply_ratio(
    amount: Amount,
    numerator: Decimal,
    denominator: Decimal,
) -> EngineResult<Amount> {
    Decimal::from(amount)
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(denominator))
        .and_then(|quotient| quotient.trunc().to_i64())
        .ok_or_else(|| overflow("reduced amount"))
}

/// Returns `amount × days`.
pub(crate) fn multiply_days(amount: Amount, days: i64) -> EngineResult<Amount> {
    amount
        .checked_mul(days)
        .ok_or_else(|| overflow("day-multiplied amount"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_apply_rate_truncates() {
        assert_eq!(apply_rate(100_000, dec("0.70")).unwrap(), 70_000);
        assert_eq!(apply_rate(33_333, dec("0.70")).unwrap(), 23_333);
        assert_eq!(apply_rate(99_999, dec("0.90")).unwrap(), 89_999);
    }

    #[test]
    fn test_rated_at_most_compares_exact_product() {
        // 91,702 × 0.7 = 64,191.4 and 91,703 × 0.7 = 64,192.1
        assert!(rated_at_most(91_702, dec("0.70"), 64_192).unwrap());
        assert!(!rated_at_most(91_703, dec("0.70"), 64_192).unwrap());
        assert!(rated_at_most(100_000, dec("0.70"), 70_000).unwrap());
        assert_eq!(apply_rate(91_703, dec("0.70")).unwrap(), 64_192);
    }

    #[test]
    fn test_apply_ratio_truncates() {
        // 80240 × 0.66 / 0.70 = 75654.857...
        assert_eq!(
            apply_ratio(80_240, dec("0.66"), dec("0.70")).unwrap(),
            75_654
        );
        assert_eq!(
            apply_ratio(70_000, dec("0.50"), dec("0.70")).unwrap(),
            50_000
        );
    }

    #[test]
    fn test_apply_ratio_zero_denominator_is_error() {
        assert!(matches!(
            apply_ratio(1, Decimal::ONE, Decimal::ZERO),
            Err(EngineError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_multiply_days_overflow_is_error() {
        assert_eq!(multiply_days(80_240, 30).unwrap(), 2_407_200);
        assert!(matches!(
            multiply_days(i64::MAX, 2),
            Err(EngineError::CalculationError { .. })
        ));
    }
}
