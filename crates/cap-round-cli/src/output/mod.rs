pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Holder lists rendered as their own tables rather than inline cells.
pub(crate) const HOLDER_LISTS: [&str; 3] = ["founders", "prior_investors", "safe_conversions"];

/// Columns of the scenario comparison, each read from a variant's `result`.
pub(crate) const COMPARISON_COLUMNS: [&str; 6] = [
    "post_money_valuation",
    "round_size",
    "final_round_percent",
    "final_safe_percent",
    "total_new_ownership",
    "unknown_ownership",
];

/// Scalar text for a JSON value. Decimals arrive as strings.
pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// One comparison row for a scenario-set variant.
pub(crate) fn comparison_row(variant: &Value) -> Vec<String> {
    let mut row = vec![variant
        .get("label")
        .map(format_scalar)
        .unwrap_or_default()];
    for column in COMPARISON_COLUMNS {
        let cell = variant
            .get("result")
            .and_then(|r| r.get(column))
            .map(format_scalar)
            .unwrap_or_default();
        row.push(cell);
    }
    row
}
