use std::io::{self, Read};

use vecthor_core::{FinancialInput, VecthorError};

/// Financial record piped on stdin.
///
/// An interactive terminal or a blank pipe yields `None` so the caller can
/// report that no record was supplied.
pub fn read_piped_record() -> Result<Option<FinancialInput>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    parse_piped(&piped)
}

fn parse_piped(piped: &str) -> Result<Option<FinancialInput>, Box<dyn std::error::Error>> {
    let body = piped.trim();
    if body.is_empty() {
        tracing::debug!("nothing piped on stdin");
        return Ok(None);
    }
    let record = serde_json::from_str(body)
        .map_err(|e| VecthorError::SerializationError(format!("stdin: {e}")))?;
    Ok(Some(record))
}
