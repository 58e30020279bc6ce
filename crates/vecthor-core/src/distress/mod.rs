//! Classical bankruptcy-prediction models.
//!
//! Implements:
//! 1. **Altman Z-Score** (Z, Z', Z'' chosen by listing status and sector)
//! 2. **Springate S-Score**
//! 3. **Taffler T-Score** (with no-credit interval)
//! 4. **Fulmer H-Factor**
//! 5. **Grover G-Score**
//! 6. **Zmijewski X-Score**
//! 7. **Ohlson O-Score**
//! 8. **Debt Service Coverage Ratio**
//!
//! Each model runs in isolation: a zero denominator, an undefined input or a
//! logarithm outside its domain makes that model not applicable and leaves
//! the others untouched.

pub mod altman;
pub mod dscr;
pub mod fulmer;
pub mod grover;
pub mod ohlson;
pub mod springate;
pub mod taffler;
pub mod zmijewski;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::financials::{FinancialInput, FinancialRecord};
use crate::math::logistic;
use crate::types::{with_metadata, ComputationOutput, Metric};

pub use altman::{AltmanScore, AltmanVariant, ZScoreComponent, ZScoreZone};

/// Decimal places kept on every reported score.
pub const SCORE_DP: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistressScores {
    pub altman_z_score: Metric,
    pub springate_s_score: Metric,
    pub taffler_t_score: Metric,
    pub fulmer_h_factor: Metric,
    pub grover_g_score: Metric,
    pub zmijewski_x_score: Metric,
    pub ohlson_o_score: Metric,
    /// `1 / (1 + e^-O)`
    pub ohlson_probability: Metric,
    pub dscr: Metric,
    /// Zone against each model's published cut-offs, where it has them
    #[serde(default)]
    pub zones: DistressZones,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altman_detail: Option<AltmanScore>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistressZones {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altman: Option<ZScoreZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub springate: Option<ZScoreZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taffler: Option<ZScoreZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulmer: Option<ZScoreZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grover: Option<ZScoreZone>,
}

impl DistressScores {
    /// (name, value) pairs in reporting order.
    pub fn entries(&self) -> [(&'static str, Metric); 9] {
        [
            ("altman_z_score", self.altman_z_score),
            ("springate_s_score", self.springate_s_score),
            ("taffler_t_score", self.taffler_t_score),
            ("fulmer_h_factor", self.fulmer_h_factor),
            ("grover_g_score", self.grover_g_score),
            ("zmijewski_x_score", self.zmijewski_x_score),
            ("ohlson_o_score", self.ohlson_o_score),
            ("ohlson_probability", self.ohlson_probability),
            ("dscr", self.dscr),
        ]
    }
}

/// Run every distress model against the record.
pub fn calculate_distress_scores(record: &FinancialRecord) -> DistressScores {
    let altman = altman::calculate_altman(record);
    let ohlson_o_score = Metric::rounded(ohlson::calculate_ohlson(record), SCORE_DP);
    let ohlson_probability =
        Metric::rounded(ohlson_o_score.value().map(logistic), SCORE_DP);

    let springate_s_score = Metric::rounded(springate::calculate_springate(record), SCORE_DP);
    let taffler_t_score = Metric::rounded(taffler::calculate_taffler(record), SCORE_DP);
    let fulmer_h_factor = Metric::rounded(fulmer::calculate_fulmer(record), SCORE_DP);
    let grover_g_score = Metric::rounded(grover::calculate_grover(record), SCORE_DP);

    // Reported (rounded) values are classified, except Altman which carries
    // its own zone.
    let zones = DistressZones {
        altman: altman.as_ref().map(|z| z.zone),
        springate: springate_s_score.value().map(springate::springate_zone),
        taffler: taffler_t_score.value().map(taffler::taffler_zone),
        fulmer: fulmer_h_factor.value().map(fulmer::fulmer_zone),
        grover: grover_g_score.value().map(grover::grover_zone),
    };

    let scores = DistressScores {
        altman_z_score: Metric::rounded(altman.as_ref().map(|z| z.score), SCORE_DP),
        springate_s_score,
        taffler_t_score,
        fulmer_h_factor,
        grover_g_score,
        zmijewski_x_score: Metric::rounded(zmijewski::calculate_zmijewski(record), SCORE_DP),
        ohlson_o_score,
        ohlson_probability,
        dscr: Metric::rounded(dscr::calculate_dscr(record), SCORE_DP),
        zones,
        altman_detail: altman,
    };

    for (name, metric) in scores.entries() {
        if !metric.is_applicable() {
            tracing::debug!(model = name, "distress model not applicable");
        }
    }

    scores
}

/// Distress models straight from caller input, wrapped in the standard
/// envelope with one warning per model that could not be computed.
pub fn analyze_distress(input: &FinancialInput) -> ComputationOutput<DistressScores> {
    let start = Instant::now();
    let record = FinancialRecord::from_input(input);
    let scores = calculate_distress_scores(&record);
    let warnings = not_applicable_warnings(&record, &scores);

    let assumptions = serde_json::json!({
        "altman_public_manufacturing": "Z = 1.2*X1 + 1.4*X2 + 3.3*X3 + 0.6*X4 + 1.0*X5",
        "altman_public_non_manufacturing": "Z'' = 6.56*X1 + 3.26*X2 + 6.72*X3 + 1.05*X4'",
        "altman_private": "Z' = 0.717*X1 + 0.847*X2 + 3.107*X3 + 0.420*X4' + 0.998*X5",
        "springate": "S = 1.03A + 3.07B + 0.66C + 0.4D",
        "taffler": "T = 3.20 + 12.18x1 + 2.50x2 - 10.68x3 + 0.029nci",
        "grover": "G = 1.650X1 + 3.404X2 - 0.016X3 + 0.057",
        "zmijewski": "X = -4.336 - 4.513roa + 5.679lev + 0.004cr",
        "ohlson": "requires prior-year net income",
        "zones": {
            "springate": "distress below 0.862",
            "taffler": "high risk below 0.2, low risk above 0.3",
            "fulmer": "failure zone below 0",
            "grover": "distress below -0.02, safe above 0.01",
        },
        "rounding_dp": SCORE_DP,
    });

    with_metadata(
        "Classical bankruptcy prediction models",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        scores,
    )
}

/// Safe above `safe_lower`, Distress below `distress_upper`, Grey between
/// (both cut-offs inclusive).
pub(crate) fn classify_zone(score: Decimal, distress_upper: Decimal, safe_lower: Decimal) -> ZScoreZone {
    if score > safe_lower {
        ZScoreZone::Safe
    } else if score < distress_upper {
        ZScoreZone::Distress
    } else {
        ZScoreZone::Grey
    }
}

/// Single cut-off: Distress strictly below it, Safe otherwise.
pub(crate) fn cutoff_zone(score: Decimal, cutoff: Decimal) -> ZScoreZone {
    if score < cutoff {
        ZScoreZone::Distress
    } else {
        ZScoreZone::Safe
    }
}

pub(crate) fn not_applicable_warnings(
    record: &FinancialRecord,
    scores: &DistressScores,
) -> Vec<String> {
    let mut warnings = Vec::new();
    for (name, metric) in scores.entries() {
        if metric.is_applicable() || name == "ohlson_probability" {
            continue;
        }
        let reason = match name {
            "ohlson_o_score" if record.net_income_prior.is_none() => {
                "prior-year net income not provided"
            }
            "dscr" if record.dscr_cash_flow.is_none() || record.dscr_debt_service.is_none() => {
                "debt service inputs not provided"
            }
            _ => "zero denominator, undefined input or invalid logarithm",
        };
        warnings.push(format!("{name}: not applicable ({reason})"));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_input() -> FinancialInput {
        FinancialInput {
            total_current_assets: Some(dec!(400)),
            total_non_current_assets: Some(dec!(600)),
            inventories: Some(dec!(80)),
            total_current_liabilities: Some(dec!(200)),
            total_non_current_liabilities: Some(dec!(300)),
            retained_earnings: Some(dec!(200)),
            ebit: Some(dec!(150)),
            revenue: Some(dec!(1500)),
            total_equity: Some(dec!(500)),
            net_income: Some(dec!(90)),
            interest_expense: Some(dec!(50)),
            tangible_fixed_assets: Some(dec!(500)),
            operating_cash_flow: Some(dec!(120)),
            depreciation: Some(dec!(40)),
            net_income_t_minus_1: Some(dec!(70)),
            dscr_cash_flow: Some(dec!(180)),
            dscr_debt_service: Some(dec!(120)),
            ..FinancialInput::default()
        }
    }

    #[test]
    fn test_all_models_defined_for_complete_record() {
        let scores = calculate_distress_scores(&FinancialRecord::from_input(&full_input()));
        for (name, metric) in scores.entries() {
            assert!(metric.is_applicable(), "{name} should be defined");
        }
        assert_eq!(scores.dscr, Metric::Value(dec!(1.5)));
        assert!(scores.altman_detail.is_some());
    }

    #[test]
    fn test_scores_rounded_to_four_places() {
        let scores = calculate_distress_scores(&FinancialRecord::from_input(&full_input()));
        for (name, metric) in scores.entries() {
            let v = metric.value().unwrap();
            assert_eq!(v, v.round_dp(4), "{name} not rounded");
        }
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut input = full_input();
        input.tangible_fixed_assets = Some(Decimal::ZERO);
        input.net_income_t_minus_1 = None;
        let record = FinancialRecord::from_input(&input);
        let scores = calculate_distress_scores(&record);

        assert_eq!(scores.fulmer_h_factor, Metric::NotApplicable);
        assert_eq!(scores.ohlson_o_score, Metric::NotApplicable);
        assert_eq!(scores.ohlson_probability, Metric::NotApplicable);
        assert!(scores.altman_z_score.is_applicable());
        assert!(scores.springate_s_score.is_applicable());
        assert!(scores.zmijewski_x_score.is_applicable());

        let warnings = not_applicable_warnings(&record, &scores);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("prior-year net income")));
    }

    #[test]
    fn test_overflowing_model_is_isolated() {
        // 12.18 * (EBIT / CL) exceeds Decimal::MAX in the Taffler score only.
        let mut input = full_input();
        input.ebit = Some(dec!(1000000000000000000000000000));
        input.total_current_liabilities = Some(dec!(0.1));
        let record = FinancialRecord::from_input(&input);
        let scores = calculate_distress_scores(&record);

        assert_eq!(scores.taffler_t_score, Metric::NotApplicable);
        assert!(scores.altman_z_score.is_applicable());
        assert!(scores.springate_s_score.is_applicable());
        assert!(scores.fulmer_h_factor.is_applicable());
        assert!(scores.grover_g_score.is_applicable());
        assert!(scores.zmijewski_x_score.is_applicable());
        assert!(scores.ohlson_o_score.is_applicable());
        assert_eq!(scores.dscr, Metric::Value(dec!(1.5)));

        let warnings = not_applicable_warnings(&record, &scores);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("taffler_t_score"));
    }

    #[test]
    fn test_zones_follow_published_cutoffs() {
        assert_eq!(springate::springate_zone(dec!(0.861)), ZScoreZone::Distress);
        assert_eq!(springate::springate_zone(dec!(0.862)), ZScoreZone::Safe);
        assert_eq!(taffler::taffler_zone(dec!(0.1)), ZScoreZone::Distress);
        assert_eq!(taffler::taffler_zone(dec!(0.25)), ZScoreZone::Grey);
        assert_eq!(taffler::taffler_zone(dec!(0.31)), ZScoreZone::Safe);
        assert_eq!(fulmer::fulmer_zone(dec!(-0.0001)), ZScoreZone::Distress);
        assert_eq!(fulmer::fulmer_zone(Decimal::ZERO), ZScoreZone::Safe);
        assert_eq!(grover::grover_zone(dec!(-0.03)), ZScoreZone::Distress);
        assert_eq!(grover::grover_zone(Decimal::ZERO), ZScoreZone::Grey);
        assert_eq!(grover::grover_zone(dec!(0.02)), ZScoreZone::Safe);
    }

    #[test]
    fn test_zones_reported_only_for_defined_scores() {
        let mut input = full_input();
        input.tangible_fixed_assets = Some(Decimal::ZERO);
        let scores = calculate_distress_scores(&FinancialRecord::from_input(&input));

        assert_eq!(scores.fulmer_h_factor, Metric::NotApplicable);
        assert_eq!(scores.zones.fulmer, None);
        assert_eq!(
            scores.zones.altman,
            scores.altman_detail.as_ref().map(|z| z.zone)
        );
        let s = scores.springate_s_score.value().unwrap();
        assert_eq!(scores.zones.springate, Some(springate::springate_zone(s)));
        assert!(scores.zones.taffler.is_some());
        assert!(scores.zones.grover.is_some());

        let json = serde_json::to_value(&scores).unwrap();
        assert!(json["zones"].get("fulmer").is_none());
        assert!(json["zones"].get("springate").is_some());
    }

    #[test]
    fn test_ohlson_probability_matches_logistic() {
        let scores = calculate_distress_scores(&FinancialRecord::from_input(&full_input()));
        let o = scores.ohlson_o_score.value().unwrap();
        assert_eq!(scores.ohlson_probability.value().unwrap(), logistic(o).round_dp(4));
    }

    #[test]
    fn test_empty_input_never_panics() {
        let out = analyze_distress(&FinancialInput::default());
        assert_eq!(out.result.altman_z_score, Metric::NotApplicable);
        assert!(!out.warnings.is_empty());
    }
}
