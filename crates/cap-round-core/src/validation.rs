use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::input::RoundInput;
use crate::CapRoundResult;

const REQUIRED_NUMBERS: [&str; 2] = ["post_money_valuation", "round_size"];
const OPTIONAL_NUMBERS: [&str; 4] = [
    "lead_investor_amount",
    "other_allocation_amount",
    "current_pool_percent",
    "target_pool_percent",
];
/// Collection name and the numeric field every entry should carry.
const COLLECTIONS: [(&str, &str); 3] = [
    ("prior_investors", "ownership_percent"),
    ("founders", "ownership_percent"),
    ("safe_notes", "amount"),
];
const POOL_TIMINGS: [&str; 2] = ["PreClose", "PostClose"];

/// Result of checking a serialized round against the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub warnings: Vec<String>,
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn check_entries(name: &str, key: &str, entries: &[Value], warnings: &mut Vec<String>) {
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            Value::Object(obj) => match obj.get(key) {
                None | Some(Value::Null) => {
                    warnings.push(format!("{name}[{i}] is missing '{key}'; treated as 0"))
                }
                Some(v) if as_decimal(v).is_none() => {
                    warnings.push(format!("{name}[{i}].{key} is not a number"))
                }
                Some(_) => {}
            },
            _ => warnings.push(format!("{name}[{i}] is not an object")),
        }
    }
}

/// Check a serialized round for shape problems.
///
/// Never fails: older saved inputs are expected to be missing newer fields,
/// and the engine fills those with defaults. Problems are reported so the
/// caller can log them.
pub fn validate_round_data(data: &Value) -> ValidationReport {
    let mut warnings = Vec::new();

    let obj = match data {
        Value::Object(obj) => obj,
        other => {
            return ValidationReport {
                valid: false,
                warnings: vec![format!("Expected a JSON object, got {}", type_name(other))],
            }
        }
    };

    for key in REQUIRED_NUMBERS {
        match obj.get(key) {
            None | Some(Value::Null) => warnings.push(format!("Missing required field '{key}'")),
            Some(v) if as_decimal(v).is_none() => {
                warnings.push(format!("'{key}' is not a number"))
            }
            Some(_) => {}
        }
    }
    for key in OPTIONAL_NUMBERS {
        if let Some(v) = obj.get(key) {
            if !v.is_null() && as_decimal(v).is_none() {
                warnings.push(format!("'{key}' is not a number; treated as 0"));
            }
        }
    }

    for (name, key) in COLLECTIONS {
        match obj.get(name) {
            None | Some(Value::Null) => {
                warnings.push(format!("'{name}' is missing; treated as empty"))
            }
            Some(Value::Array(entries)) => check_entries(name, key, entries, &mut warnings),
            Some(other) => warnings.push(format!(
                "'{name}' should be an array, got {}; treated as empty",
                type_name(other)
            )),
        }
    }

    if let Some(timing) = obj.get("pool_timing") {
        let known = timing
            .as_str()
            .map(|t| POOL_TIMINGS.contains(&t))
            .unwrap_or(false);
        if !known {
            warnings.push(format!("Unknown pool_timing {timing}; expected PreClose or PostClose"));
        }
    }

    let amount = |key: &str| obj.get(key).and_then(as_decimal);
    if let (Some(round), Some(lead), Some(other)) = (
        amount("round_size"),
        amount("lead_investor_amount"),
        amount("other_allocation_amount"),
    ) {
        if lead + other != round {
            warnings.push(format!(
                "Lead ({lead}) and other ({other}) allocations do not sum to the round size ({round})"
            ));
        }
    }

    ValidationReport {
        valid: warnings.is_empty(),
        warnings,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Replace malformed optional parts with defaults so deserialization succeeds.
fn with_defaults(mut obj: Map<String, Value>) -> Map<String, Value> {
    for (name, _) in COLLECTIONS {
        let keep: Option<Vec<Value>> = match obj.get(name) {
            Some(Value::Array(entries)) => {
                Some(entries.iter().filter(|e| e.is_object()).cloned().collect())
            }
            _ => None,
        };
        match keep {
            Some(entries) => {
                obj.insert(name.to_string(), Value::Array(entries));
            }
            None => {
                obj.remove(name);
            }
        }
    }
    for key in OPTIONAL_NUMBERS {
        if obj.get(key).map(|v| as_decimal(v).is_none()).unwrap_or(false) {
            obj.remove(key);
        }
    }
    if let Some(timing) = obj.get("pool_timing") {
        if !timing.as_str().map(|t| POOL_TIMINGS.contains(&t)).unwrap_or(false) {
            obj.remove("pool_timing");
        }
    }
    obj
}

/// Validate and deserialize a round, filling best-effort defaults.
///
/// Warnings are logged and returned; only a shape that cannot be turned into
/// a round at all (e.g. a non-numeric post-money) is an error.
pub fn parse_round_input(data: Value) -> CapRoundResult<(RoundInput, Vec<String>)> {
    let report = validate_round_data(&data);
    for w in &report.warnings {
        tracing::warn!(warning = %w, "round input validation");
    }

    let data = match data {
        Value::Object(obj) => Value::Object(with_defaults(obj)),
        other => other,
    };
    let input: RoundInput = serde_json::from_value(data)?;
    Ok((input, report.warnings))
}
