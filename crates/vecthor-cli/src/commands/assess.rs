use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use vecthor_core::{assess_risk, MlSignal, RiskAssessmentInput};

use crate::input;

/// Arguments for the full risk assessment
#[derive(Args)]
pub struct AssessArgs {
    /// Path to JSON financial record
    #[arg(long)]
    pub input: Option<String>,

    /// Default probability from an external model, in [0, 1]
    #[arg(long)]
    pub ml_probability: Option<Decimal>,

    /// The external probability comes from the calibrated model
    #[arg(long, requires = "ml_probability")]
    pub ml_calibrated: bool,

    /// Engine configuration (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_assess(args: AssessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let financials = input::read_financials(args.input.as_deref())?;
    let config = args
        .config
        .as_deref()
        .map(input::file::read_config)
        .transpose()?;

    let assessment_input = RiskAssessmentInput {
        financials,
        ml_signal: args
            .ml_probability
            .map(|p| MlSignal::new(p, args.ml_calibrated)),
        config,
    };
    let result = assess_risk(&assessment_input)?;
    Ok(serde_json::to_value(result)?)
}
