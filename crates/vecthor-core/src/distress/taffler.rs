use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{classify_zone, ZScoreZone};
use crate::financials::FinancialRecord;
use crate::math::{checked_diff, linear_combination, safe_div};

const DAYS_PER_YEAR: Decimal = dec!(365);

/// High risk below, low risk above, grey in between.
pub const TAFFLER_DISTRESS: Decimal = dec!(0.2);
pub const TAFFLER_SAFE: Decimal = dec!(0.3);

/// Taffler T-Score with the no-credit-interval term.
///
/// `T = 3.20 + 12.18·x1 + 2.50·x2 − 10.68·x3 + 0.029·nci`, where profit before
/// tax is EBIT less interest and the no-credit interval is
/// `(quick assets − CL) / daily operating expenses`. Any undefined term makes
/// the whole score undefined.
pub fn calculate_taffler(record: &FinancialRecord) -> Option<Decimal> {
    let ta = record.total_assets?;
    let cl = record.total_current_liabilities?;
    let pbt = checked_diff(record.ebit, record.interest_expense)?;

    let x1 = safe_div(pbt, cl)?;
    let x2 = safe_div(record.total_current_assets?, record.total_liabilities?)?;
    let x3 = safe_div(cl, ta)?;

    let opex = checked_diff(checked_diff(record.revenue, Some(pbt)), record.depreciation)?;
    let daily_opex = opex / DAYS_PER_YEAR;
    let nci = safe_div(checked_diff(record.quick_assets, Some(cl))?, daily_opex)?;

    linear_combination(&[
        (dec!(3.20), Decimal::ONE),
        (dec!(12.18), x1),
        (dec!(2.50), x2),
        (dec!(-10.68), x3),
        (dec!(0.029), nci),
    ])
}

pub fn taffler_zone(score: Decimal) -> ZScoreZone {
    classify_zone(score, TAFFLER_DISTRESS, TAFFLER_SAFE)
}
