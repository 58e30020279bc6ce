//! ESG signal resolution.
//!
//! A company arrives with at most one usable ESG shape: an agency letter
//! rating, three 1–5 pillar sliders, or a 0–100 overall score. The shapes are
//! tried in that order and the first that matches is the only one used.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::VecthorError;
use crate::financials::{FinancialInput, FinancialRecord};
use crate::math::checked_sum;
use crate::types::{with_metadata, ComputationOutput};
use crate::VecthorResult;

const SLIDER_MIN: Decimal = dec!(1);
const SLIDER_MAX: Decimal = dec!(5);
const OVERALL_MAX: Decimal = dec!(100);
const WEIGHT_TOLERANCE: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// ESG fields carried on the financial record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsgInputs {
    pub rating: Option<String>,
    /// Slider 1–5, zero means not provided
    pub environmental: Option<Decimal>,
    pub social: Option<Decimal>,
    pub governance: Option<Decimal>,
    /// 0–100
    pub overall: Option<Decimal>,
    pub pillar_weights: Option<PillarWeights>,
}

/// Relative weight of each slider in the average. Must be non-negative and
/// sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarWeights {
    pub environmental: Decimal,
    pub social: Decimal,
    pub governance: Decimal,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EsgRating {
    Aaa,
    Aa,
    A,
    Bbb,
    Bb,
    B,
    Ccc,
    Cc,
    C,
}

impl EsgRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            EsgRating::Aaa => "AAA",
            EsgRating::Aa => "AA",
            EsgRating::A => "A",
            EsgRating::Bbb => "BBB",
            EsgRating::Bb => "BB",
            EsgRating::B => "B",
            EsgRating::Ccc => "CCC",
            EsgRating::Cc => "CC",
            EsgRating::C => "C",
        }
    }

    /// Fixed 0–100 score for a letter.
    pub fn score(&self) -> Decimal {
        match self {
            EsgRating::Aaa => dec!(100),
            EsgRating::Aa => dec!(90),
            EsgRating::A => dec!(80),
            EsgRating::Bbb => dec!(70),
            EsgRating::Bb => dec!(60),
            EsgRating::B => dec!(50),
            EsgRating::Ccc => dec!(40),
            EsgRating::Cc => dec!(30),
            EsgRating::C => dec!(20),
        }
    }

    /// Letter for a 0–100 score.
    pub fn from_score(score: Decimal) -> Self {
        if score >= dec!(85) {
            EsgRating::Aaa
        } else if score >= dec!(75) {
            EsgRating::Aa
        } else if score >= dec!(65) {
            EsgRating::A
        } else if score >= dec!(55) {
            EsgRating::Bbb
        } else if score >= dec!(45) {
            EsgRating::Bb
        } else if score >= dec!(35) {
            EsgRating::B
        } else if score >= dec!(25) {
            EsgRating::Ccc
        } else if score >= dec!(15) {
            EsgRating::Cc
        } else {
            EsgRating::C
        }
    }
}

impl fmt::Display for EsgRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EsgRating {
    type Err = VecthorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AAA" => Ok(EsgRating::Aaa),
            "AA" => Ok(EsgRating::Aa),
            "A" => Ok(EsgRating::A),
            "BBB" => Ok(EsgRating::Bbb),
            "BB" => Ok(EsgRating::Bb),
            "B" => Ok(EsgRating::B),
            "CCC" => Ok(EsgRating::Ccc),
            "CC" => Ok(EsgRating::Cc),
            "C" => Ok(EsgRating::C),
            other => Err(VecthorError::InvalidInput {
                field: "esg_rating".into(),
                reason: format!("unknown rating letter '{other}'"),
            }),
        }
    }
}

/// Which input shape produced the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EsgSource {
    Rating,
    Sliders,
    Numeric,
}

/// Slider values as supplied, zero read as not provided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsgPillars {
    pub environmental: Option<Decimal>,
    pub social: Option<Decimal>,
    pub governance: Option<Decimal>,
}

/// Resolved ESG signal. Every field is `None` when no shape matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsgResult {
    /// 0–100
    pub score: Option<Decimal>,
    pub source: Option<EsgSource>,
    pub rating: Option<EsgRating>,
    pub pillars: EsgPillars,
}

impl EsgResult {
    pub fn is_present(&self) -> bool {
        self.score.is_some()
    }
}

// ---------------------------------------------------------------------------
// Resolution rules
// ---------------------------------------------------------------------------

struct Resolved {
    score: Decimal,
    source: EsgSource,
    rating: Option<EsgRating>,
}

type EsgRule = fn(&EsgInputs, &EsgPillars, &mut Vec<String>) -> Option<Resolved>;

/// Priority order; the first rule returning `Some` wins.
const RULES: [EsgRule; 3] = [from_rating, from_sliders, from_overall];

fn from_rating(inputs: &EsgInputs, _: &EsgPillars, warnings: &mut Vec<String>) -> Option<Resolved> {
    let raw = inputs.rating.as_deref()?;
    match raw.parse::<EsgRating>() {
        Ok(rating) => Some(Resolved {
            score: rating.score(),
            source: EsgSource::Rating,
            rating: Some(rating),
        }),
        Err(e) => {
            warnings.push(format!("{e}; rating ignored"));
            None
        }
    }
}

fn from_sliders(
    inputs: &EsgInputs,
    pillars: &EsgPillars,
    warnings: &mut Vec<String>,
) -> Option<Resolved> {
    let e = pillars.environmental?;
    let s = pillars.social?;
    let g = pillars.governance?;

    if [e, s, g].iter().any(|v| *v < SLIDER_MIN || *v > SLIDER_MAX) {
        warnings.push(format!(
            "esg sliders must lie in [{SLIDER_MIN}, {SLIDER_MAX}] (got E={e}, S={s}, G={g}); sliders ignored"
        ));
        return None;
    }

    let avg = match &inputs.pillar_weights {
        Some(w) => w.environmental * e + w.social * s + w.governance * g,
        None => (e + s + g) / dec!(3),
    };
    let score = ((avg - SLIDER_MIN) / dec!(4) * dec!(100)).round_dp(0);

    Some(Resolved {
        score,
        source: EsgSource::Sliders,
        rating: None,
    })
}

fn from_overall(inputs: &EsgInputs, _: &EsgPillars, warnings: &mut Vec<String>) -> Option<Resolved> {
    let overall = inputs.overall?;
    if overall < Decimal::ZERO || overall > OVERALL_MAX {
        warnings.push(format!(
            "esg_overall must lie in [0, {OVERALL_MAX}] (got {overall}); overall score ignored"
        ));
        return None;
    }
    let score = overall.round_dp(0);
    Some(Resolved {
        score,
        source: EsgSource::Numeric,
        rating: Some(EsgRating::from_score(score)),
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve the ESG signal, appending a warning for every shape that was
/// supplied but unusable.
pub fn resolve_esg(inputs: &EsgInputs, warnings: &mut Vec<String>) -> VecthorResult<EsgResult> {
    if let Some(w) = &inputs.pillar_weights {
        validate_weights(w)?;
    }

    let pillars = EsgPillars {
        environmental: provided(inputs.environmental),
        social: provided(inputs.social),
        governance: provided(inputs.governance),
    };

    let resolved = RULES
        .iter()
        .find_map(|rule| rule(inputs, &pillars, warnings));

    Ok(match resolved {
        Some(r) => {
            tracing::debug!(source = ?r.source, score = %r.score, "esg signal resolved");
            EsgResult {
                score: Some(r.score),
                source: Some(r.source),
                rating: r.rating,
                pillars,
            }
        }
        None => {
            tracing::debug!("no esg signal");
            EsgResult {
                pillars,
                ..EsgResult::default()
            }
        }
    })
}

/// ESG resolution straight from caller input, wrapped in the standard
/// envelope.
pub fn calculate_esg(input: &FinancialInput) -> VecthorResult<ComputationOutput<EsgResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let record = FinancialRecord::from_input(input);
    let result = resolve_esg(&record.esg, &mut warnings)?;
    if !result.is_present() {
        warnings.push("no usable ESG input; ESG signal absent".into());
    }

    let assumptions = serde_json::json!({
        "priority": ["rating", "sliders", "numeric"],
        "rating_scale": {
            "AAA": 100, "AA": 90, "A": 80, "BBB": 70, "BB": 60,
            "B": 50, "CCC": 40, "CC": 30, "C": 20
        },
        "slider_score": "round(((avg - 1) / 4) * 100)",
        "custom_weights": record.esg.pillar_weights.is_some(),
    });

    Ok(with_metadata(
        "ESG signal resolution (rating, sliders, overall score)",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn provided(slider: Option<Decimal>) -> Option<Decimal> {
    slider.filter(|v| !v.is_zero())
}

fn validate_weights(w: &PillarWeights) -> VecthorResult<()> {
    if w.environmental < Decimal::ZERO || w.social < Decimal::ZERO || w.governance < Decimal::ZERO {
        return Err(VecthorError::InvalidInput {
            field: "esg_pillar_weights".into(),
            reason: "Pillar weights must be non-negative.".into(),
        });
    }
    let sum = checked_sum(checked_sum(Some(w.environmental), Some(w.social)), Some(w.governance));
    match sum {
        Some(sum) if (sum - Decimal::ONE).abs() <= WEIGHT_TOLERANCE => Ok(()),
        Some(sum) => Err(VecthorError::InvalidInput {
            field: "esg_pillar_weights".into(),
            reason: format!("Pillar weights must sum to 1.0 (got {sum})."),
        }),
        None => Err(VecthorError::InvalidInput {
            field: "esg_pillar_weights".into(),
            reason: "Pillar weights must sum to 1.0 (sum overflows).".into(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sliders(e: Decimal, s: Decimal, g: Decimal) -> EsgInputs {
        EsgInputs {
            environmental: Some(e),
            social: Some(s),
            governance: Some(g),
            ..EsgInputs::default()
        }
    }

    fn resolve(inputs: &EsgInputs) -> (EsgResult, Vec<String>) {
        let mut warnings = Vec::new();
        let result = resolve_esg(inputs, &mut warnings).unwrap();
        (result, warnings)
    }

    #[test]
    fn test_rating_beats_sliders() {
        let mut inputs = sliders(dec!(4), dec!(3), dec!(5));
        inputs.rating = Some("BBB".into());
        let (r, _) = resolve(&inputs);
        assert_eq!(r.score, Some(dec!(70)));
        assert_eq!(r.source, Some(EsgSource::Rating));
        assert_eq!(r.rating, Some(EsgRating::Bbb));
        // Sliders are still reported
        assert_eq!(r.pillars.social, Some(dec!(3)));
    }

    #[test]
    fn test_rating_letter_is_case_insensitive() {
        let inputs = EsgInputs {
            rating: Some(" aa ".into()),
            ..EsgInputs::default()
        };
        let (r, _) = resolve(&inputs);
        assert_eq!(r.score, Some(dec!(90)));
    }

    #[test]
    fn test_unknown_letter_falls_through() {
        let inputs = EsgInputs {
            rating: Some("D".into()),
            overall: Some(dec!(62.4)),
            ..EsgInputs::default()
        };
        let (r, warnings) = resolve(&inputs);
        assert_eq!(r.source, Some(EsgSource::Numeric));
        assert_eq!(r.score, Some(dec!(62)));
        assert_eq!(r.rating, Some(EsgRating::Bbb));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_slider_average() {
        let (r, _) = resolve(&sliders(dec!(4), dec!(3), dec!(5)));
        // avg 4 -> (3 / 4) * 100
        assert_eq!(r.score, Some(dec!(75)));
        assert_eq!(r.source, Some(EsgSource::Sliders));
        assert_eq!(r.rating, None);
    }

    #[test]
    fn test_weighted_sliders() {
        let mut inputs = sliders(dec!(5), dec!(1), dec!(1));
        inputs.pillar_weights = Some(PillarWeights {
            environmental: dec!(0.5),
            social: dec!(0.25),
            governance: dec!(0.25),
        });
        let (r, _) = resolve(&inputs);
        // avg 3 -> 50
        assert_eq!(r.score, Some(dec!(50)));
    }

    #[test]
    fn test_zero_slider_means_not_provided() {
        let mut inputs = sliders(dec!(4), Decimal::ZERO, dec!(5));
        inputs.overall = Some(dec!(30));
        let (r, _) = resolve(&inputs);
        assert_eq!(r.source, Some(EsgSource::Numeric));
        assert_eq!(r.pillars.social, None);
    }

    #[test]
    fn test_out_of_range_slider_warns() {
        let (r, warnings) = resolve(&sliders(dec!(4), dec!(7), dec!(5)));
        assert!(!r.is_present());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_overall_breakpoints() {
        assert_eq!(EsgRating::from_score(dec!(85)), EsgRating::Aaa);
        assert_eq!(EsgRating::from_score(dec!(84)), EsgRating::Aa);
        assert_eq!(EsgRating::from_score(dec!(45)), EsgRating::Bb);
        assert_eq!(EsgRating::from_score(dec!(15)), EsgRating::Cc);
        assert_eq!(EsgRating::from_score(dec!(14)), EsgRating::C);
    }

    #[test]
    fn test_overall_out_of_range_ignored() {
        let inputs = EsgInputs {
            overall: Some(dec!(140)),
            ..EsgInputs::default()
        };
        let (r, warnings) = resolve(&inputs);
        assert_eq!(r, EsgResult::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_no_input_no_signal() {
        let (r, warnings) = resolve(&EsgInputs::default());
        assert_eq!(r.score, None);
        assert_eq!(r.source, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bad_pillar_weights_rejected() {
        let mut inputs = sliders(dec!(3), dec!(3), dec!(3));
        inputs.pillar_weights = Some(PillarWeights {
            environmental: dec!(0.5),
            social: dec!(0.5),
            governance: dec!(0.5),
        });
        let mut warnings = Vec::new();
        assert!(resolve_esg(&inputs, &mut warnings).is_err());
    }

    #[test]
    fn test_huge_pillar_weights_rejected() {
        let mut inputs = sliders(dec!(3), dec!(3), dec!(3));
        inputs.pillar_weights = Some(PillarWeights {
            environmental: Decimal::MAX,
            social: Decimal::MAX,
            governance: Decimal::ZERO,
        });
        let mut warnings = Vec::new();
        match resolve_esg(&inputs, &mut warnings) {
            Err(VecthorError::InvalidInput { field, .. }) => assert_eq!(field, "esg_pillar_weights"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rating_serializes_as_letters() {
        let json = serde_json::to_string(&EsgRating::Bbb).unwrap();
        assert_eq!(json, "\"BBB\"");
        let json = serde_json::to_string(&EsgSource::Sliders).unwrap();
        assert_eq!(json, "\"sliders\"");
    }
}
