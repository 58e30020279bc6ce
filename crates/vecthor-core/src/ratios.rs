use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::financials::{FinancialInput, FinancialRecord};
use crate::math::{checked_diff, positive_div};
use crate::types::{with_metadata, ComputationOutput, Metric, Money};

/// Decimal places kept on every reported ratio.
pub const RATIO_DP: u32 = 4;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    // Liquidity
    pub current_ratio: Metric,
    pub quick_ratio: Metric,
    // Leverage
    pub debt_to_equity_ratio: Metric,
    pub debt_to_assets_ratio: Metric,
    pub interest_coverage_ratio: Metric,
    // Profitability
    pub roa: Metric,
    pub roe: Metric,
    pub roi: Metric,
    pub ros: Metric,
    // Efficiency
    pub asset_turnover: Metric,
}

impl RatioSet {
    /// (name, value) pairs in reporting order.
    pub fn entries(&self) -> [(&'static str, Metric); 10] {
        [
            ("current_ratio", self.current_ratio),
            ("quick_ratio", self.quick_ratio),
            ("debt_to_equity_ratio", self.debt_to_equity_ratio),
            ("debt_to_assets_ratio", self.debt_to_assets_ratio),
            ("interest_coverage_ratio", self.interest_coverage_ratio),
            ("roa", self.roa),
            ("roe", self.roe),
            ("roi", self.roi),
            ("ros", self.ros),
            ("asset_turnover", self.asset_turnover),
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the standard ratio set. A ratio is defined only when its
/// denominator is strictly positive.
pub fn calculate_ratios(record: &FinancialRecord) -> RatioSet {
    let ca = record.total_current_assets;
    let cl = record.total_current_liabilities;
    let ta = record.total_assets;
    let tl = record.total_liabilities;
    let equity = record.total_equity;

    let quick_numerator = checked_diff(ca, record.inventories);

    RatioSet {
        current_ratio: ratio(ca, cl),
        quick_ratio: ratio(quick_numerator, cl),
        debt_to_equity_ratio: ratio(tl, equity),
        debt_to_assets_ratio: ratio(tl, ta),
        interest_coverage_ratio: ratio(record.ebit, record.interest_expense),
        roa: ratio(record.net_income, ta),
        roe: ratio(record.net_income, equity),
        roi: ratio(record.ebit, ta),
        ros: ratio(record.ebit, record.revenue),
        asset_turnover: ratio(record.revenue, ta),
    }
}

/// Ratio analysis straight from caller input, wrapped in the standard
/// envelope.
pub fn analyze_ratios(input: &FinancialInput) -> ComputationOutput<RatioSet> {
    let start = Instant::now();
    let record = FinancialRecord::from_input(input);
    let ratios = calculate_ratios(&record);

    let warnings = not_applicable_warnings(&ratios);

    let assumptions = serde_json::json!({
        "guard": "denominator must be strictly positive",
        "rounding_dp": RATIO_DP,
        "quick_ratio": "(current assets - inventories) / current liabilities",
        "interest_coverage_ratio": "EBIT / interest expense",
    });

    with_metadata(
        "Standard financial ratio analysis",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        ratios,
    )
}

pub(crate) fn not_applicable_warnings(ratios: &RatioSet) -> Vec<String> {
    ratios
        .entries()
        .iter()
        .filter(|(_, m)| !m.is_applicable())
        .map(|(name, _)| format!("{name}: not applicable (denominator is zero, negative or undefined)"))
        .collect()
}

fn ratio(num: Option<Money>, den: Option<Money>) -> Metric {
    let value = match (num, den) {
        (Some(n), Some(d)) => positive_div(n, d),
        _ => None,
    };
    Metric::rounded(value, RATIO_DP)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
