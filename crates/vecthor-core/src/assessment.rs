//! End-to-end risk assessment: ratios, distress models, ESG and the external
//! model probability, normalised and blended into one banded score.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::aggregate::{aggregate, AggregationResult, RiskSignals};
use crate::config::EngineConfig;
use crate::distress::{self, calculate_distress_scores, DistressScores};
use crate::esg::{resolve_esg, EsgResult};
use crate::financials::{FinancialInput, FinancialRecord};
use crate::ml::MlSignal;
use crate::normalize::{esg_risk, normalize_distress, normalize_ratios};
use crate::ratios::{self, calculate_ratios, RatioSet};
use crate::types::{with_metadata, ComputationOutput};
use crate::VecthorResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskAssessmentInput {
    #[serde(default)]
    pub financials: FinancialInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_signal: Option<MlSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
}

/// Flat assessment: every ratio and distress score sits at the top level
/// next to the ESG result, the final score and its band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<i32>,
    pub is_publicly_listed: bool,
    pub is_manufacturing: bool,
    #[serde(flatten)]
    pub ratios: RatioSet,
    #[serde(flatten)]
    pub distress: DistressScores,
    pub esg: EsgResult,
    #[serde(flatten)]
    pub aggregation: AggregationResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full assessment.
///
/// Financial data never makes this fail: metrics that cannot be computed
/// are reported as not applicable and listed in `warnings`. Only an invalid
/// configuration, an out-of-range ML probability or malformed ESG pillar
/// weights return an error.
pub fn assess_risk(
    input: &RiskAssessmentInput,
) -> VecthorResult<ComputationOutput<RiskAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation ----------------------------------------------------------
    let config = input.config.clone().unwrap_or_default();
    config.validate()?;
    let ml = input.ml_signal.map(|s| s.risk()).transpose()?;
    let ml_calibrated = input.ml_signal.is_some_and(|s| s.is_calibrated);

    // -- Raw scores ----------------------------------------------------------
    let record = FinancialRecord::from_input(&input.financials);
    let ratio_set = calculate_ratios(&record);
    let distress_scores = calculate_distress_scores(&record);
    let esg = resolve_esg(&record.esg, &mut warnings)?;

    warnings.extend(ratios::not_applicable_warnings(&ratio_set));
    warnings.extend(distress::not_applicable_warnings(&record, &distress_scores));
    if !esg.is_present() {
        warnings.push("no usable ESG input; ESG pillar excluded".into());
    }
    if ml.is_none() {
        warnings.push("no external model probability; non-calibrated weights applied".into());
    }

    // -- Normalise and blend -------------------------------------------------
    let signals = RiskSignals {
        distress: normalize_distress(&distress_scores, &config.calibration),
        ratios: normalize_ratios(&ratio_set, &config.calibration),
        esg: esg_risk(esg.score),
        ml,
        ml_calibrated,
    };
    let aggregation = aggregate(&signals, &config.regimes, &config.bands);

    if !aggregation.overall_score.is_applicable() {
        warnings.push("no risk signal available; overall score not applicable".into());
    }
    tracing::debug!(
        score = %aggregation.overall_score,
        band = %aggregation.band,
        "risk assessment complete"
    );

    let output = RiskAssessment {
        company_name: record.company_name.clone(),
        country: record.country.clone(),
        fiscal_year: record.fiscal_year,
        is_publicly_listed: record.is_publicly_listed,
        is_manufacturing: record.is_manufacturing,
        ratios: ratio_set,
        distress: distress_scores,
        esg,
        aggregation,
    };

    let assumptions = serde_json::json!({
        "classics_pillar": "median of defined distress-model risks",
        "ratios_pillar": "median of defined ratio risks",
        "blend": "weighted mean over present pillars, weights renormalised",
        "regime": if ml_calibrated && ml.is_some() { "calibrated" } else { "non_calibrated" },
        "bands": {
            "low": format!("< {}", config.bands.low),
            "medium": format!("{} to {}", config.bands.low, config.bands.high),
            "high": format!("> {}", config.bands.high),
        },
    });

    Ok(with_metadata(
        "Composite credit risk: distress models, ratios, ESG and external model",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
