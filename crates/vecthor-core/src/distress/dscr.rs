use rust_decimal::Decimal;

use crate::financials::FinancialRecord;
use crate::math::safe_div;

/// Debt service coverage: cash flow available for debt service over the
/// debt service due. Both figures must be supplied and non-zero.
pub fn calculate_dscr(record: &FinancialRecord) -> Option<Decimal> {
    let cash_flow = record.dscr_cash_flow.filter(|v| !v.is_zero())?;
    safe_div(cash_flow, record.dscr_debt_service?)
}
