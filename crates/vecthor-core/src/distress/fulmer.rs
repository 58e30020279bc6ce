use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{cutoff_zone, ZScoreZone};
use crate::financials::FinancialRecord;
use crate::math::{checked_diff, linear_combination, ln, safe_div};

/// Fulmer H-Factor over nine ratios.
///
/// F7 is the log of tangible fixed assets and F9 the log of EBIT over
/// interest expense; both logarithms need a strictly positive argument.
pub fn calculate_fulmer(record: &FinancialRecord) -> Option<Decimal> {
    let ta = record.total_assets?;
    let total_debt = record.total_debt?;
    let ebit = record.ebit?;
    let interest = record.interest_expense?;

    let f1 = safe_div(record.retained_earnings?, ta)?;
    let f2 = safe_div(record.revenue?, ta)?;
    let f3 = safe_div(checked_diff(Some(ebit), Some(interest))?, record.total_equity?)?;
    let f4 = safe_div(record.operating_cash_flow?, total_debt)?;
    let f5 = safe_div(total_debt, ta)?;
    let f6 = safe_div(record.total_current_liabilities?, ta)?;
    let f7 = ln(record.tangible_fixed_assets?)?;
    let f8 = safe_div(record.working_capital?, total_debt)?;
    let f9 = safe_div(ln(ebit)?, interest)?;

    linear_combination(&[
        (dec!(5.528), f1),
        (dec!(0.212), f2),
        (dec!(0.073), f3),
        (dec!(1.270), f4),
        (dec!(-0.120), f5),
        (dec!(2.335), f6),
        (dec!(0.575), f7),
        (dec!(1.083), f8),
        (dec!(0.894), f9),
        (dec!(-6.075), Decimal::ONE),
    ])
}

/// A negative H-Factor is the failure zone.
pub fn fulmer_zone(score: Decimal) -> ZScoreZone {
    cutoff_zone(score, Decimal::ZERO)
}
