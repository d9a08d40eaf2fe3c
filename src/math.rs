//! Decimal helpers shared by the summarizer, breakdowns and listing merger.
//! Every empty denominator is defined as zero.

use rust_decimal::Decimal;

use crate::error::{ValuationError, ValuationResult};

pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `100 * part / whole`, or zero when `whole` is zero or the result is out
/// of range.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_mul(HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        // divide first when scaling by 100 would overflow
        .or_else(|| part.checked_div(whole)?.checked_mul(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator`, or zero when `denominator` is zero or the
/// result is out of range.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `a * b`, failing with [`ValuationError::Overflow`] for `what` instead of
/// panicking when the product does not fit in a `Decimal`.
pub fn checked_product(a: Decimal, b: Decimal, what: &str) -> ValuationResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| ValuationError::Overflow(what.to_string()))
}
