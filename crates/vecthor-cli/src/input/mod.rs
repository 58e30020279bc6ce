pub mod file;
pub mod stdin;

use chrono::Datelike;
use vecthor_core::{FinancialInput, VecthorError};

/// Financial record from `--input` or piped stdin.
///
/// A record without a fiscal year is stamped with the current calendar year.
pub fn read_financials(path: Option<&str>) -> Result<FinancialInput, Box<dyn std::error::Error>> {
    let record = match path {
        Some(path) => Some(file::read_record(path)?),
        None => stdin::read_piped_record()?,
    };
    let mut record = record.ok_or_else(|| {
        VecthorError::InsufficientData("--input <file.json> or a financial record on stdin required".into())
    })?;

    stamp_fiscal_year(&mut record, chrono::Utc::now().year());
    Ok(record)
}

fn stamp_fiscal_year(record: &mut FinancialInput, current_year: i32) {
    if record.fiscal_year.is_none() {
        tracing::info!(fiscal_year = current_year, "no fiscal year in record, assuming the current year");
        record.fiscal_year = Some(current_year);
    }
}
