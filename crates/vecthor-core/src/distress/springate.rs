use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{cutoff_zone, ZScoreZone};
use crate::financials::FinancialRecord;
use crate::math::{checked_diff, linear_combination, safe_div};

/// Scores below this mark a company as likely to fail.
pub const SPRINGATE_CUTOFF: Decimal = dec!(0.862);

/// Springate S-Score: `1.03A + 3.07B + 0.66C + 0.4D`.
///
/// C uses profit before tax over current liabilities, so it is undefined
/// when current liabilities are zero.
pub fn calculate_springate(record: &FinancialRecord) -> Option<Decimal> {
    let ta = record.total_assets?;
    let ebit = record.ebit?;

    let a = safe_div(record.working_capital?, ta)?;
    let b = safe_div(ebit, ta)?;
    let c = safe_div(checked_diff(Some(ebit), record.interest_expense)?, record.total_current_liabilities?)?;
    let d = safe_div(record.revenue?, ta)?;

    linear_combination(&[(dec!(1.03), a), (dec!(3.07), b), (dec!(0.66), c), (dec!(0.4), d)])
}

/// Below the cut-off is Distress, anything else Safe; there is no grey zone.
pub fn springate_zone(score: Decimal) -> ZScoreZone {
    cutoff_zone(score, SPRINGATE_CUTOFF)
}
