use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{classify_zone, ZScoreZone};
use crate::financials::FinancialRecord;
use crate::math::{linear_combination, safe_div};

pub const GROVER_DISTRESS: Decimal = dec!(-0.02);
pub const GROVER_SAFE: Decimal = dec!(0.01);

/// Grover G-Score: `1.650·X1 + 3.404·X2 − 0.016·X3 + 0.057`.
pub fn calculate_grover(record: &FinancialRecord) -> Option<Decimal> {
    let ta = record.total_assets?;

    let x1 = safe_div(record.working_capital?, ta)?;
    let x2 = safe_div(record.ebit?, ta)?;
    let x3 = safe_div(record.net_income?, ta)?;

    linear_combination(&[
        (dec!(1.650), x1),
        (dec!(3.404), x2),
        (dec!(-0.016), x3),
        (dec!(0.057), Decimal::ONE),
    ])
}

pub fn grover_zone(score: Decimal) -> ZScoreZone {
    classify_zone(score, GROVER_DISTRESS, GROVER_SAFE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::FinancialInput;

    #[test]
    fn test_grover_formula() {
        let input = FinancialInput {
            total_current_assets: Some(dec!(400)),
            total_non_current_assets: Some(dec!(600)),
            total_current_liabilities: Some(dec!(200)),
            ebit: Some(dec!(100)),
            net_income: Some(dec!(50)),
            ..FinancialInput::default()
        };
        let g = calculate_grover(&FinancialRecord::from_input(&input)).unwrap();
        // 1.65*0.2 + 3.404*0.1 - 0.016*0.05 + 0.057
        assert_eq!(g, dec!(0.7266));
    }

    #[test]
    fn test_zero_assets_not_applicable() {
        assert!(calculate_grover(&FinancialRecord::from_input(&FinancialInput::default())).is_none());
    }
}
