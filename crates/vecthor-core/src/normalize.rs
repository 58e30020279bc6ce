//! Maps every raw ratio, distress score and ESG score onto a common [0,1]
//! risk scale, where 0 is no risk and 1 is maximal risk.
//!
//! Most metrics use a linear calibration between a "bad" and a "good"
//! anchor. The direction of the metric is carried by the anchors themselves:
//! `good > bad` means higher is better, `good < bad` means lower is better.
//! Ohlson goes through the logistic curve and ESG is rescaled directly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::distress::DistressScores;
use crate::error::VecthorError;
use crate::math::{clamp_unit, logistic, safe_div};
use crate::ratios::RatioSet;
use crate::types::{Metric, Rate};
use crate::VecthorResult;

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// Linear anchor pair: risk is 1 at or beyond `bad`, 0 at or beyond `good`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub bad: Decimal,
    pub good: Decimal,
}

impl Calibration {
    pub const fn new(bad: Decimal, good: Decimal) -> Self {
        Calibration { bad, good }
    }

    pub fn higher_is_better(&self) -> bool {
        self.good > self.bad
    }

    /// Risk for a raw value, linear between the anchors and clamped to [0,1].
    ///
    /// A value so far from the anchors that the interpolation overflows is
    /// saturated on its side.
    pub fn risk(&self, value: Decimal) -> Option<Rate> {
        let span = self.bad.checked_sub(self.good).filter(|s| !s.is_zero())?;
        let saturated = if (value > self.good) == (self.bad > self.good) {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        let risk = value
            .checked_sub(self.good)
            .and_then(|offset| safe_div(offset, span))
            .map(clamp_unit)
            .unwrap_or(saturated);
        Some(risk)
    }
}

/// Anchor pairs for every linearly normalised metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationTable {
    pub current_ratio: Calibration,
    pub quick_ratio: Calibration,
    pub debt_to_equity_ratio: Calibration,
    pub debt_to_assets_ratio: Calibration,
    pub interest_coverage_ratio: Calibration,
    pub roa: Calibration,
    pub roe: Calibration,
    pub roi: Calibration,
    pub ros: Calibration,
    pub asset_turnover: Calibration,
    pub altman: Calibration,
    pub springate: Calibration,
    pub taffler: Calibration,
    pub fulmer: Calibration,
    pub grover: Calibration,
    /// X-Score mapped from [-2, 2] onto [0, 1]
    pub zmijewski: Calibration,
    /// Maximal risk below 0.8, minimal at 1.5 and above
    pub dscr: Calibration,
}

impl Default for CalibrationTable {
    fn default() -> Self {
        CalibrationTable {
            current_ratio: Calibration::new(dec!(1.0), dec!(2.0)),
            quick_ratio: Calibration::new(dec!(1.0), dec!(1.5)),
            debt_to_equity_ratio: Calibration::new(dec!(3.00), dec!(0.50)),
            debt_to_assets_ratio: Calibration::new(dec!(0.80), dec!(0.20)),
            interest_coverage_ratio: Calibration::new(dec!(1.0), dec!(5.0)),
            roa: Calibration::new(dec!(-0.05), dec!(0.15)),
            roe: Calibration::new(dec!(-0.10), dec!(0.25)),
            roi: Calibration::new(dec!(-0.05), dec!(0.15)),
            ros: Calibration::new(dec!(-0.05), dec!(0.15)),
            asset_turnover: Calibration::new(dec!(0.20), dec!(1.50)),
            altman: Calibration::new(dec!(1.81), dec!(3.00)),
            springate: Calibration::new(dec!(0.86), dec!(1.10)),
            taffler: Calibration::new(dec!(0.20), dec!(0.30)),
            fulmer: Calibration::new(dec!(-1.0), dec!(1.0)),
            grover: Calibration::new(dec!(-0.50), dec!(0.20)),
            zmijewski: Calibration::new(dec!(2), dec!(-2)),
            dscr: Calibration::new(dec!(0.8), dec!(1.5)),
        }
    }
}

impl CalibrationTable {
    fn entries(&self) -> [(&'static str, &Calibration); 17] {
        [
            ("current_ratio", &self.current_ratio),
            ("quick_ratio", &self.quick_ratio),
            ("debt_to_equity_ratio", &self.debt_to_equity_ratio),
            ("debt_to_assets_ratio", &self.debt_to_assets_ratio),
            ("interest_coverage_ratio", &self.interest_coverage_ratio),
            ("roa", &self.roa),
            ("roe", &self.roe),
            ("roi", &self.roi),
            ("ros", &self.ros),
            ("asset_turnover", &self.asset_turnover),
            ("altman", &self.altman),
            ("springate", &self.springate),
            ("taffler", &self.taffler),
            ("fulmer", &self.fulmer),
            ("grover", &self.grover),
            ("zmijewski", &self.zmijewski),
            ("dscr", &self.dscr),
        ]
    }

    /// Anchors must differ, otherwise the interpolation is undefined.
    pub fn validate(&self) -> VecthorResult<()> {
        for (name, cal) in self.entries() {
            if cal.bad == cal.good {
                return Err(VecthorError::InvalidInput {
                    field: format!("calibration.{name}"),
                    reason: format!("bad and good anchors must differ (both {})", cal.bad),
                });
            }
            if cal.bad.checked_sub(cal.good).is_none() {
                return Err(VecthorError::InvalidInput {
                    field: format!("calibration.{name}"),
                    reason: format!("anchors {} and {} are too far apart", cal.bad, cal.good),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Risk sets
// ---------------------------------------------------------------------------

/// Per-ratio risk; `None` when the ratio was not applicable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioRisks {
    pub current_ratio: Option<Rate>,
    pub quick_ratio: Option<Rate>,
    pub debt_to_equity_ratio: Option<Rate>,
    pub debt_to_assets_ratio: Option<Rate>,
    pub interest_coverage_ratio: Option<Rate>,
    pub roa: Option<Rate>,
    pub roe: Option<Rate>,
    pub roi: Option<Rate>,
    pub ros: Option<Rate>,
    pub asset_turnover: Option<Rate>,
}

impl RatioRisks {
    pub fn values(&self) -> [Option<Rate>; 10] {
        [
            self.current_ratio,
            self.quick_ratio,
            self.debt_to_equity_ratio,
            self.debt_to_assets_ratio,
            self.interest_coverage_ratio,
            self.roa,
            self.roe,
            self.roi,
            self.ros,
            self.asset_turnover,
        ]
    }
}

/// Per-model risk; `None` when the model was not applicable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistressRisks {
    pub ohlson: Option<Rate>,
    pub altman: Option<Rate>,
    pub zmijewski: Option<Rate>,
    pub springate: Option<Rate>,
    pub taffler: Option<Rate>,
    pub fulmer: Option<Rate>,
    pub grover: Option<Rate>,
    pub dscr: Option<Rate>,
}

impl DistressRisks {
    pub fn values(&self) -> [Option<Rate>; 8] {
        [
            self.ohlson,
            self.altman,
            self.zmijewski,
            self.springate,
            self.taffler,
            self.fulmer,
            self.grover,
            self.dscr,
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Linear risk for a metric; not applicable in, absent out.
pub fn linear_risk(metric: Metric, calibration: &Calibration) -> Option<Rate> {
    metric.value().and_then(|v| calibration.risk(v))
}

/// Ohlson O is on a logit scale already.
pub fn ohlson_risk(metric: Metric) -> Option<Rate> {
    metric.value().map(logistic)
}

/// ESG risk from a 0–100 score. A score above 1 is read as a percentage
/// and rescaled; a score at or below 1 is taken as already on [0,1].
pub fn esg_risk(score: Option<Decimal>) -> Option<Rate> {
    let score = score?;
    let unit = if score > Decimal::ONE {
        score / dec!(100)
    } else {
        score
    };
    Some(clamp_unit(Decimal::ONE - unit))
}

pub fn normalize_ratios(ratios: &RatioSet, table: &CalibrationTable) -> RatioRisks {
    RatioRisks {
        current_ratio: linear_risk(ratios.current_ratio, &table.current_ratio),
        quick_ratio: linear_risk(ratios.quick_ratio, &table.quick_ratio),
        debt_to_equity_ratio: linear_risk(ratios.debt_to_equity_ratio, &table.debt_to_equity_ratio),
        debt_to_assets_ratio: linear_risk(ratios.debt_to_assets_ratio, &table.debt_to_assets_ratio),
        interest_coverage_ratio: linear_risk(
            ratios.interest_coverage_ratio,
            &table.interest_coverage_ratio,
        ),
        roa: linear_risk(ratios.roa, &table.roa),
        roe: linear_risk(ratios.roe, &table.roe),
        roi: linear_risk(ratios.roi, &table.roi),
        ros: linear_risk(ratios.ros, &table.ros),
        asset_turnover: linear_risk(ratios.asset_turnover, &table.asset_turnover),
    }
}

pub fn normalize_distress(scores: &DistressScores, table: &CalibrationTable) -> DistressRisks {
    DistressRisks {
        ohlson: ohlson_risk(scores.ohlson_o_score),
        altman: linear_risk(scores.altman_z_score, &table.altman),
        zmijewski: linear_risk(scores.zmijewski_x_score, &table.zmijewski),
        springate: linear_risk(scores.springate_s_score, &table.springate),
        taffler: linear_risk(scores.taffler_t_score, &table.taffler),
        fulmer: linear_risk(scores.fulmer_h_factor, &table.fulmer),
        grover: linear_risk(scores.grover_g_score, &table.grover),
        dscr: linear_risk(scores.dscr, &table.dscr),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
