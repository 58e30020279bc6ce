use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::financials::FinancialRecord;
use crate::math::{checked_diff, linear_combination, ln, safe_div};

/// Ohlson O-Score (logit scale).
///
/// The `intwo` and `chin` terms compare against the prior year's net income;
/// without it the score is not computed at all rather than computed with
/// those terms zeroed.
pub fn calculate_ohlson(record: &FinancialRecord) -> Option<Decimal> {
    let ta = record.total_assets?;
    let tl = record.total_liabilities?;
    let ni = record.net_income?;
    let ni_prior = record.net_income_prior?;

    let size = match record.gnp_price_level_index.filter(|g| !g.is_zero()) {
        Some(gnp) => ln(safe_div(ta, gnp)?)?,
        None => ln(ta)?,
    };
    let tlta = safe_div(tl, ta)?;
    let wcta = safe_div(record.working_capital?, ta)?;
    let clca = safe_div(record.total_current_liabilities?, record.total_current_assets?)?;
    let nita = safe_div(ni, ta)?;
    let futl = safe_div(record.operating_cash_flow?, tl)?;
    let oeneg = indicator(tl > ta);
    let intwo = indicator(ni < Decimal::ZERO && ni_prior < Decimal::ZERO);
    let chin_scale = ni.abs().checked_add(ni_prior.abs())?;
    let chin = if chin_scale.is_zero() {
        Decimal::ZERO
    } else {
        safe_div(checked_diff(Some(ni), Some(ni_prior))?, chin_scale)?
    };

    linear_combination(&[
        (dec!(-1.32), Decimal::ONE),
        (dec!(-0.407), size),
        (dec!(6.03), tlta),
        (dec!(-1.43), wcta),
        (dec!(0.076), clca),
        (dec!(-1.72), oeneg),
        (dec!(-2.37), nita),
        (dec!(-1.83), futl),
        (dec!(0.285), intwo),
        (dec!(-0.521), chin),
    ])
}

fn indicator(condition: bool) -> Decimal {
    if condition {
        Decimal::ONE
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::FinancialInput;

    fn sample_input() -> FinancialInput {
        FinancialInput {
            total_current_assets: Some(dec!(400)),
            total_non_current_assets: Some(dec!(600)),
            total_current_liabilities: Some(dec!(200)),
            total_non_current_liabilities: Some(dec!(400)),
            net_income: Some(dec!(50)),
            net_income_t_minus_1: Some(dec!(30)),
            operating_cash_flow: Some(dec!(120)),
            ..FinancialInput::default()
        }
    }

    #[test]
    fn test_ohlson_formula() {
        let o = calculate_ohlson(&FinancialRecord::from_input(&sample_input())).unwrap();
        let size = ln(dec!(1000)).unwrap();
        // tlta 0.6, wcta 0.2, clca 0.5, nita 0.05, futl 0.2, chin 20/80
        let expected = dec!(-1.32) - dec!(0.407) * size + dec!(6.03) * dec!(0.6)
            - dec!(1.43) * dec!(0.2)
            + dec!(0.076) * dec!(0.5)
            - dec!(2.37) * dec!(0.05)
            - dec!(1.83) * dec!(0.2)
            - dec!(0.521) * dec!(0.25);
        assert!((o - expected).abs() < dec!(0.000001), "o={o} expected={expected}");
    }

    #[test]
    fn test_missing_prior_net_income_suppresses_score() {
        let mut input = sample_input();
        input.net_income_t_minus_1 = None;
        assert!(calculate_ohlson(&FinancialRecord::from_input(&input)).is_none());
    }

    #[test]
    fn test_gnp_index_deflates_size() {
        let base = calculate_ohlson(&FinancialRecord::from_input(&sample_input())).unwrap();
        let mut input = sample_input();
        input.gnp_price_level_index = Some(dec!(10));
        let deflated = calculate_ohlson(&FinancialRecord::from_input(&input)).unwrap();
        // size falls by ln(10), raising O by 0.407 * ln(10)
        let delta = dec!(0.407) * ln(dec!(10)).unwrap();
        assert!((deflated - base - delta).abs() < dec!(0.000001));
    }

    #[test]
    fn test_zero_gnp_index_falls_back_to_raw_size() {
        let base = calculate_ohlson(&FinancialRecord::from_input(&sample_input())).unwrap();
        let mut input = sample_input();
        input.gnp_price_level_index = Some(Decimal::ZERO);
        assert_eq!(calculate_ohlson(&FinancialRecord::from_input(&input)).unwrap(), base);
    }

    #[test]
    fn test_two_loss_years_and_insolvency_indicators() {
        let mut input = sample_input();
        input.net_income = Some(dec!(-40));
        input.net_income_t_minus_1 = Some(dec!(-40));
        input.total_non_current_liabilities = Some(dec!(1000));
        let record = FinancialRecord::from_input(&input);
        let o = calculate_ohlson(&record).unwrap();

        let size = ln(dec!(1000)).unwrap();
        // tlta 1.2, oeneg 1, intwo 1, chin 0 (no change)
        let expected = dec!(-1.32) - dec!(0.407) * size + dec!(6.03) * dec!(1.2)
            - dec!(1.43) * dec!(0.2)
            + dec!(0.076) * dec!(0.5)
            - dec!(1.72)
            - dec!(2.37) * dec!(-0.04)
            - dec!(1.83) * dec!(0.1)
            + dec!(0.285);
        assert!((o - expected).abs() < dec!(0.000001), "o={o} expected={expected}");
    }

    #[test]
    fn test_zero_income_both_years_chin_is_zero() {
        let mut input = sample_input();
        input.net_income = Some(Decimal::ZERO);
        input.net_income_t_minus_1 = Some(Decimal::ZERO);
        assert!(calculate_ohlson(&FinancialRecord::from_input(&input)).is_some());
    }

    #[test]
    fn test_non_positive_assets_not_applicable() {
        let mut input = sample_input();
        input.total_current_assets = Some(dec!(-600));
        assert!(calculate_ohlson(&FinancialRecord::from_input(&input)).is_none());
    }
}
