use serde_json::Value;
use std::io;

use super::flatten_fields;

/// Write output as a two-column `field,value` CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten_fields(body) {
        // Absent values stay empty in CSV
        let val = if val == "null" { String::new() } else { val };
        let _ = wtr.write_record([key, val]);
    }

    let _ = wtr.flush();
}
