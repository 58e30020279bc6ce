//! Two-stage blend of the risk signals into one score.
//!
//! Stage 1 collapses the distress models and the ratios into one value each
//! with a median, which keeps a single outlying model from dragging the
//! pillar. Stage 2 takes a weighted mean over the four pillars, using only
//! the pillars that are present and renormalising their weights.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::VecthorError;
use crate::math::{clamp_unit, median};
use crate::normalize::{DistressRisks, RatioRisks};
use crate::types::{Metric, Rate};
use crate::VecthorResult;

/// Decimal places kept on the final score.
pub const SCORE_DP: u32 = 6;

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// Base weight of each pillar within one regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeWeights {
    pub ml: Decimal,
    pub classics: Decimal,
    pub ratios: Decimal,
    pub esg: Decimal,
}

impl RegimeWeights {
    pub fn get(&self, pillar: Pillar) -> Decimal {
        match pillar {
            Pillar::Ml => self.ml,
            Pillar::Classics => self.classics,
            Pillar::Ratios => self.ratios,
            Pillar::Esg => self.esg,
        }
    }

    fn zero() -> Self {
        RegimeWeights {
            ml: Decimal::ZERO,
            classics: Decimal::ZERO,
            ratios: Decimal::ZERO,
            esg: Decimal::ZERO,
        }
    }

    fn set(&mut self, pillar: Pillar, value: Decimal) {
        match pillar {
            Pillar::Ml => self.ml = value,
            Pillar::Classics => self.classics = value,
            Pillar::Ratios => self.ratios = value,
            Pillar::Esg => self.esg = value,
        }
    }
}

/// Weights for each regime. The calibrated regime trusts the external model
/// far more than the local signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeTable {
    pub calibrated: RegimeWeights,
    pub non_calibrated: RegimeWeights,
}

impl Default for RegimeTable {
    fn default() -> Self {
        RegimeTable {
            calibrated: RegimeWeights {
                ml: dec!(0.65),
                classics: dec!(0.15),
                ratios: dec!(0.07),
                esg: dec!(0.13),
            },
            non_calibrated: RegimeWeights {
                ml: dec!(0.10),
                classics: dec!(0.45),
                ratios: dec!(0.25),
                esg: dec!(0.20),
            },
        }
    }
}

impl RegimeTable {
    pub fn weights(&self, regime: WeightRegime) -> &RegimeWeights {
        match regime {
            WeightRegime::Calibrated => &self.calibrated,
            WeightRegime::NonCalibrated => &self.non_calibrated,
        }
    }

    pub fn validate(&self) -> VecthorResult<()> {
        for (regime, weights) in [("calibrated", &self.calibrated), ("non_calibrated", &self.non_calibrated)] {
            for pillar in Pillar::ALL {
                if weights.get(pillar) < Decimal::ZERO {
                    return Err(VecthorError::InvalidInput {
                        field: format!("regimes.{regime}.{pillar}"),
                        reason: "Pillar weights must be non-negative.".into(),
                    });
                }
            }
            let total = Pillar::ALL
                .iter()
                .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(weights.get(*p)));
            if total.is_none() {
                return Err(VecthorError::InvalidInput {
                    field: format!("regimes.{regime}"),
                    reason: "Pillar weights are too large to sum.".into(),
                });
            }
        }
        Ok(())
    }
}

/// Band cut-offs: low below `low`, high above `high`, medium in between
/// (both ends inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    pub low: Decimal,
    pub high: Decimal,
}

impl Default for BandThresholds {
    fn default() -> Self {
        BandThresholds {
            low: dec!(0.40),
            high: dec!(0.60),
        }
    }
}

impl BandThresholds {
    pub fn classify(&self, score: Option<Rate>) -> RiskBand {
        match score {
            None => RiskBand::NotApplicable,
            Some(s) if s < self.low => RiskBand::Low,
            Some(s) if s > self.high => RiskBand::High,
            Some(_) => RiskBand::Medium,
        }
    }

    pub fn validate(&self) -> VecthorResult<()> {
        let in_unit = |v: Decimal| v >= Decimal::ZERO && v <= Decimal::ONE;
        if !in_unit(self.low) || !in_unit(self.high) {
            return Err(VecthorError::InvalidInput {
                field: "bands".into(),
                reason: format!("thresholds must lie in [0, 1] (got {} / {})", self.low, self.high),
            });
        }
        if self.low > self.high {
            return Err(VecthorError::InvalidInput {
                field: "bands".into(),
                reason: format!("low threshold {} exceeds high threshold {}", self.low, self.high),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Ml,
    Classics,
    Ratios,
    Esg,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [Pillar::Ml, Pillar::Classics, Pillar::Ratios, Pillar::Esg];
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pillar::Ml => "ml",
            Pillar::Classics => "classics",
            Pillar::Ratios => "ratios",
            Pillar::Esg => "esg",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightRegime {
    Calibrated,
    NonCalibrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
            RiskBand::NotApplicable => crate::types::NOT_APPLICABLE,
        };
        f.write_str(name)
    }
}

/// Pillar values entering stage 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PillarValues {
    pub ml: Option<Rate>,
    pub classics: Option<Rate>,
    pub ratios: Option<Rate>,
    pub esg: Option<Rate>,
}

impl PillarValues {
    pub fn get(&self, pillar: Pillar) -> Option<Rate> {
        match pillar {
            Pillar::Ml => self.ml,
            Pillar::Classics => self.classics,
            Pillar::Ratios => self.ratios,
            Pillar::Esg => self.esg,
        }
    }

    fn set(&mut self, pillar: Pillar, value: Rate) {
        let slot = match pillar {
            Pillar::Ml => &mut self.ml,
            Pillar::Classics => &mut self.classics,
            Pillar::Ratios => &mut self.ratios,
            Pillar::Esg => &mut self.esg,
        };
        *slot = Some(value);
    }
}

/// Everything that went into the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationBreakdown {
    pub regime: WeightRegime,
    pub distress_risks: DistressRisks,
    pub ratio_risks: RatioRisks,
    pub pillars: PillarValues,
    pub base_weights: RegimeWeights,
    /// Base weights renormalised over the present pillars; zero for absent ones
    pub applied_weights: RegimeWeights,
    pub contributions: PillarValues,
    /// Sum of base weights over the present pillars
    pub weight_sum: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub overall_score: Metric,
    pub band: RiskBand,
    pub breakdown: AggregationBreakdown,
}

/// Normalised risk signals handed to the aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskSignals {
    pub distress: DistressRisks,
    pub ratios: RatioRisks,
    pub esg: Option<Rate>,
    /// Already validated and nudged into (0, 1)
    pub ml: Option<Rate>,
    pub ml_calibrated: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Mean of the present values, each weighted by its paired weight, divided by
/// the sum of the weights actually used. Returns `(mean, weight_sum)`, or
/// `None` when no value is present or the present weights sum to zero.
pub fn weighted_mean_present(pairs: &[(Option<Decimal>, Decimal)]) -> Option<(Decimal, Decimal)> {
    let (numerator, weight_sum) = pairs
        .iter()
        .filter_map(|(value, weight)| value.map(|v| (v, *weight)))
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(num, den), (v, w)| {
            Some((num.checked_add(v.checked_mul(w)?)?, den.checked_add(w)?))
        })?;
    if weight_sum.is_zero() {
        return None;
    }
    Some((numerator.checked_div(weight_sum)?, weight_sum))
}

/// Median of the defined values; `None` for an empty group.
pub fn pillar_median(values: &[Option<Rate>]) -> Option<Rate> {
    let present: Vec<Decimal> = values.iter().flatten().copied().collect();
    median(&present)
}

/// Regime is calibrated only when a calibrated ML signal is present.
pub fn select_regime(ml: Option<Rate>, calibrated: bool) -> WeightRegime {
    if ml.is_some() && calibrated {
        WeightRegime::Calibrated
    } else {
        WeightRegime::NonCalibrated
    }
}

/// Blend the signals into the final score, band and breakdown.
pub fn aggregate(
    signals: &RiskSignals,
    regimes: &RegimeTable,
    bands: &BandThresholds,
) -> AggregationResult {
    let pillars = PillarValues {
        ml: signals.ml,
        classics: pillar_median(&signals.distress.values()),
        ratios: pillar_median(&signals.ratios.values()),
        esg: signals.esg,
    };

    let regime = select_regime(signals.ml, signals.ml_calibrated);
    let base_weights = *regimes.weights(regime);
    tracing::debug!(?regime, "weight regime selected");

    let pairs: Vec<(Option<Decimal>, Decimal)> = Pillar::ALL
        .iter()
        .map(|p| (pillars.get(*p), base_weights.get(*p)))
        .collect();

    for pillar in Pillar::ALL {
        if pillars.get(pillar).is_none() {
            tracing::debug!(%pillar, "pillar absent, excluded from blend");
        }
    }

    let blended = weighted_mean_present(&pairs);
    let weight_sum = blended.map_or(Decimal::ZERO, |(_, sum)| sum);

    let mut applied_weights = RegimeWeights::zero();
    let mut contributions = PillarValues::default();
    if !weight_sum.is_zero() {
        for pillar in Pillar::ALL {
            if let Some(value) = pillars.get(pillar) {
                let weight = base_weights.get(pillar) / weight_sum;
                applied_weights.set(pillar, weight);
                contributions.set(pillar, value * weight);
            }
        }
    }

    let score = blended.map(|(mean, _)| clamp_unit(mean).round_dp(SCORE_DP));
    let band = bands.classify(score);

    AggregationResult {
        overall_score: Metric::from(score),
        band,
        breakdown: AggregationBreakdown {
            regime,
            distress_risks: signals.distress.clone(),
            ratio_risks: signals.ratios.clone(),
            pillars,
            base_weights,
            applied_weights,
            contributions,
            weight_sum,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    /// Distress and ratio risks whose medians are the given values.
    fn signals(classics: Option<Rate>, ratios: Option<Rate>) -> RiskSignals {
        RiskSignals {
            distress: DistressRisks {
                altman: classics,
                ..DistressRisks::default()
            },
            ratios: RatioRisks {
                roa: ratios,
                ..RatioRisks::default()
            },
            ..RiskSignals::default()
        }
    }

    #[test]
    fn test_renormalised_two_pillar_blend() {
        let result = aggregate(
            &signals(Some(dec!(0.6)), Some(dec!(0.4))),
            &RegimeTable::default(),
            &BandThresholds::default(),
        );
        assert_eq!(result.overall_score, Metric::Value(dec!(0.528571)));
        assert_eq!(result.band, RiskBand::Medium);

        let b = &result.breakdown;
        assert_eq!(b.regime, WeightRegime::NonCalibrated);
        assert_eq!(b.weight_sum, dec!(0.70));
        assert!(approx_eq(b.applied_weights.classics, dec!(0.642857), dec!(0.000001)));
        assert!(approx_eq(b.applied_weights.ratios, dec!(0.357143), dec!(0.000001)));
        assert_eq!(b.applied_weights.ml, Decimal::ZERO);
        assert_eq!(b.contributions.esg, None);
    }

    #[test]
    fn test_applied_weights_sum_to_one() {
        let mut s = signals(Some(dec!(0.2)), Some(dec!(0.3)));
        s.esg = Some(dec!(0.5));
        s.ml = Some(dec!(0.9));
        s.ml_calibrated = true;
        let b = aggregate(&s, &RegimeTable::default(), &BandThresholds::default()).breakdown;
        let w = b.applied_weights;
        assert!(approx_eq(w.ml + w.classics + w.ratios + w.esg, Decimal::ONE, dec!(0.0000001)));
        assert_eq!(b.regime, WeightRegime::Calibrated);
    }

    #[test]
    fn test_calibrated_flag_ignored_without_ml() {
        let mut s = signals(Some(dec!(0.5)), None);
        s.ml_calibrated = true;
        let r = aggregate(&s, &RegimeTable::default(), &BandThresholds::default());
        assert_eq!(r.breakdown.regime, WeightRegime::NonCalibrated);
        assert_eq!(r.overall_score, Metric::Value(dec!(0.5)));
    }

    #[test]
    fn test_no_pillars_not_applicable() {
        let r = aggregate(&RiskSignals::default(), &RegimeTable::default(), &BandThresholds::default());
        assert_eq!(r.overall_score, Metric::NotApplicable);
        assert_eq!(r.band, RiskBand::NotApplicable);
        assert_eq!(r.breakdown.weight_sum, Decimal::ZERO);
    }

    #[test]
    fn test_medians_ignore_absent_members() {
        assert_eq!(
            pillar_median(&[Some(dec!(0.1)), None, Some(dec!(0.9)), Some(dec!(0.5))]),
            Some(dec!(0.5))
        );
        assert_eq!(pillar_median(&[Some(dec!(0.2)), Some(dec!(0.8)), None]), Some(dec!(0.5)));
        assert_eq!(pillar_median(&[None, None]), None);
    }

    #[test]
    fn test_weighted_mean_skips_absent_values() {
        let pairs = [(Some(dec!(1)), dec!(1)), (None, dec!(5)), (Some(dec!(0)), dec!(3))];
        assert_eq!(weighted_mean_present(&pairs), Some((dec!(0.25), dec!(4))));
        assert_eq!(weighted_mean_present(&[(None, dec!(1))]), None);
        assert_eq!(weighted_mean_present(&[(Some(dec!(0.4)), Decimal::ZERO)]), None);
    }

    #[test]
    fn test_band_edges() {
        let bands = BandThresholds::default();
        assert_eq!(bands.classify(Some(dec!(0.399999))), RiskBand::Low);
        assert_eq!(bands.classify(Some(dec!(0.40))), RiskBand::Medium);
        assert_eq!(bands.classify(Some(dec!(0.60))), RiskBand::Medium);
        assert_eq!(bands.classify(Some(dec!(0.600001))), RiskBand::High);
        assert_eq!(bands.classify(None), RiskBand::NotApplicable);
    }

    #[test]
    fn test_band_validation() {
        assert!(BandThresholds { low: dec!(0.7), high: dec!(0.3) }.validate().is_err());
        assert!(BandThresholds { low: dec!(0.2), high: dec!(1.3) }.validate().is_err());
        assert!(BandThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_negative_regime_weight_rejected() {
        let mut table = RegimeTable::default();
        table.non_calibrated.esg = dec!(-0.1);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_regime_weights_that_overflow_rejected() {
        let mut table = RegimeTable::default();
        table.calibrated.ml = Decimal::MAX;
        table.calibrated.classics = Decimal::MAX;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_weighted_mean_overflow_is_undefined() {
        let pairs = [(Some(dec!(0.5)), Decimal::MAX), (Some(dec!(0.5)), Decimal::MAX)];
        assert_eq!(weighted_mean_present(&pairs), None);
    }

    #[test]
    fn test_band_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskBand::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&RiskBand::NotApplicable).unwrap(), "\"N/A\"");
    }
}
