use napi::Result as NapiResult;
use napi_derive::napi;

use vecthor_core::{FinancialInput, RiskAssessmentInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_financials(input_json: &str) -> NapiResult<FinancialInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Full assessment. Takes `{ financials, ml_signal?, config? }`.
#[napi]
pub fn assess_risk(input_json: String) -> NapiResult<String> {
    let input: RiskAssessmentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = vecthor_core::assess_risk(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single stages
// ---------------------------------------------------------------------------

#[napi]
pub fn financial_ratios(input_json: String) -> NapiResult<String> {
    let input = parse_financials(&input_json)?;
    let output = vecthor_core::ratios::analyze_ratios(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn distress_scores(input_json: String) -> NapiResult<String> {
    let input = parse_financials(&input_json)?;
    let output = vecthor_core::distress::analyze_distress(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn resolve_esg(input_json: String) -> NapiResult<String> {
    let input = parse_financials(&input_json)?;
    let output = vecthor_core::esg::calculate_esg(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
