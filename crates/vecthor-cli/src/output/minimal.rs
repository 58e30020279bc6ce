use serde_json::Value;

use super::format_scalar;

/// Print just the key answer value from the output.
///
/// An assessment prints its score and band; other results print the first
/// well-known field present, then fall back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", format_scalar(result_obj));
        return;
    };

    if let (Some(score), Some(band)) = (map.get("overall_score"), map.get("band")) {
        println!("{} ({})", format_scalar(score), format_scalar(band));
        return;
    }

    let priority_keys = ["score", "altman_z_score", "current_ratio"];
    for key in &priority_keys {
        if let Some(val) = map.get(*key) {
            if !val.is_null() {
                println!("{}", format_scalar(val));
                return;
            }
        }
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, format_scalar(val));
    }
}
