use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::financials::FinancialRecord;
use crate::math::{linear_combination, safe_div};

/// Zmijewski X-Score (probit scale): `−4.336 − 4.513·ROA + 5.679·TL/TA + 0.004·CA/CL`.
pub fn calculate_zmijewski(record: &FinancialRecord) -> Option<Decimal> {
    let ta = record.total_assets?;

    let roa = safe_div(record.net_income?, ta)?;
    let leverage = safe_div(record.total_liabilities?, ta)?;
    let liquidity = safe_div(record.total_current_assets?, record.total_current_liabilities?)?;

    linear_combination(&[
        (dec!(-4.336), Decimal::ONE),
        (dec!(-4.513), roa),
        (dec!(5.679), leverage),
        (dec!(0.004), liquidity),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::FinancialInput;

    fn input() -> FinancialInput {
        FinancialInput {
            total_current_assets: Some(dec!(900)),
            total_non_current_assets: Some(dec!(1100)),
            total_current_liabilities: Some(dec!(400)),
            total_non_current_liabilities: Some(dec!(600)),
            net_income: Some(dec!(200)),
            ..FinancialInput::default()
        }
    }

    #[test]
    fn test_zmijewski_formula() {
        let x = calculate_zmijewski(&FinancialRecord::from_input(&input())).unwrap();
        // -4.336 - 4.513*0.1 + 5.679*0.5 + 0.004*2.25
        assert_eq!(x, dec!(-1.9388));
    }

    #[test]
    fn test_higher_leverage_raises_score() {
        let base = calculate_zmijewski(&FinancialRecord::from_input(&input())).unwrap();
        let mut levered = input();
        levered.total_non_current_liabilities = Some(dec!(1400));
        let x = calculate_zmijewski(&FinancialRecord::from_input(&levered)).unwrap();
        assert!(x > base);
    }

    #[test]
    fn test_zero_current_liabilities_not_applicable() {
        let mut i = input();
        i.total_current_liabilities = Some(Decimal::ZERO);
        assert!(calculate_zmijewski(&FinancialRecord::from_input(&i)).is_none());
    }
}
