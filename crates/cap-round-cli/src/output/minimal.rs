use serde_json::Value;

use super::format_scalar;

/// Print just the headline figure from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // A scenario set reports one headline line per variant
    if let Some(Value::Array(variants)) = result_obj.get("scenarios") {
        for variant in variants {
            let label = variant.get("label").map(format_scalar).unwrap_or_default();
            let round = variant
                .get("result")
                .and_then(|r| r.get("final_round_percent"))
                .map(format_scalar)
                .unwrap_or_default();
            println!("{}: {}", label, round);
        }
        return;
    }

    let priority_keys = [
        "final_round_percent",
        "round_percent",
        "valid",
        "error_message",
    ];

    if let Value::Object(map) = result_obj {
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
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}
