use clap::Args;
use serde_json::Value;

use vecthor_core::{distress, esg, ratios};

use crate::input;

/// Arguments shared by the single-stage commands
#[derive(Args)]
pub struct RecordArgs {
    /// Path to JSON financial record
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_ratios(args: RecordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let record = input::read_financials(args.input.as_deref())?;
    let result = ratios::analyze_ratios(&record);
    Ok(serde_json::to_value(result)?)
}

pub fn run_distress(args: RecordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let record = input::read_financials(args.input.as_deref())?;
    let result = distress::analyze_distress(&record);
    Ok(serde_json::to_value(result)?)
}

pub fn run_esg(args: RecordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let record = input::read_financials(args.input.as_deref())?;
    let result = esg::calculate_esg(&record)?;
    Ok(serde_json::to_value(result)?)
}
