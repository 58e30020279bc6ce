//! Guarded arithmetic shared by the calculators.
//!
//! Every helper returns `Option` instead of failing: a zero denominator, a
//! logarithm outside its domain or an overflow past `Decimal::MAX` makes the
//! caller's metric not applicable.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Beyond this magnitude the logistic curve is flat at 0 or 1 to well past
/// 28 significant digits, and `exp` would overflow.
const LOGISTIC_SATURATION: Decimal = dec!(60);

/// `num / den`, undefined when `den` is zero.
pub fn safe_div(num: Decimal, den: Decimal) -> Option<Decimal> {
    if den.is_zero() {
        None
    } else {
        num.checked_div(den)
    }
}

/// `num / den`, undefined unless `den` is strictly positive.
pub fn positive_div(num: Decimal, den: Decimal) -> Option<Decimal> {
    if den > Decimal::ZERO {
        num.checked_div(den)
    } else {
        None
    }
}

/// `a + b`, undefined when either side is undefined or the sum overflows.
pub fn checked_sum(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    a?.checked_add(b?)
}

/// `a - b`, undefined when either side is undefined or the difference
/// overflows.
pub fn checked_diff(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    a?.checked_sub(b?)
}

/// `Σ coefficient·term` over `(coefficient, term)` pairs, evaluated left to
/// right. Undefined if any product or partial sum overflows.
pub fn linear_combination(terms: &[(Decimal, Decimal)]) -> Option<Decimal> {
    terms
        .iter()
        .try_fold(Decimal::ZERO, |acc, (coefficient, term)| {
            acc.checked_add(coefficient.checked_mul(*term)?)
        })
}

/// Natural logarithm, undefined for non-positive input.
pub fn ln(x: Decimal) -> Option<Decimal> {
    if x > Decimal::ZERO {
        x.checked_ln()
    } else {
        None
    }
}

/// Logistic function `1 / (1 + e^-x)`.
pub fn logistic(x: Decimal) -> Decimal {
    if x >= LOGISTIC_SATURATION {
        return Decimal::ONE;
    }
    if x <= -LOGISTIC_SATURATION {
        return Decimal::ZERO;
    }
    // Evaluate on the side where exp() shrinks.
    if x >= Decimal::ZERO {
        match (-x).checked_exp() {
            Some(e) => Decimal::ONE / (Decimal::ONE + e),
            None => Decimal::ONE,
        }
    } else {
        match x.checked_exp() {
            Some(e) => e / (Decimal::ONE + e),
            None => Decimal::ZERO,
        }
    }
}

/// Clamp into the closed unit interval.
pub fn clamp_unit(x: Decimal) -> Decimal {
    x.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Standard median: mean of the two middle values for an even count.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let count = sorted.len();
    let median = if count % 2 == 0 {
        let mid = count / 2;
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        // The sum overflows only for same-sign values, where the gap fits.
        lo.checked_add(hi)
            .map(|sum| sum / dec!(2))
            .or_else(|| hi.checked_sub(lo).map(|gap| lo + gap / dec!(2)))
            .unwrap_or(lo)
    } else {
        sorted[count / 2]
    };
    Some(median)
}
