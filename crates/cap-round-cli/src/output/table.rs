use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{comparison_row, format_scalar, COMPARISON_COLUMNS, HOLDER_LISTS};

/// Format output as tables using the tabled crate.
///
/// A scenario prints its headline figures, then one table per holder list.
/// A scenario set prints a single comparison table across variants.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", format_scalar(value));
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => {
            if let Some(Value::Array(variants)) = result.get("scenarios") {
                print_comparison(variants, result.get("dropped"));
            } else {
                print_scenario(result);
            }
            print_notes(envelope);
        }
        _ => print_fields(envelope),
    }
}

fn print_scenario(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        if val.is_array() || val.is_object() {
            continue;
        }
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Object(esop)) = result.get("esop") {
        println!("\nOption pool:");
        print_fields(esop);
    }

    for list in HOLDER_LISTS {
        if let Some(Value::Array(rows)) = result.get(list) {
            if rows.is_empty() {
                continue;
            }
            println!("\n{}:", list.replace('_', " "));
            print_rows(rows);
        }
    }
}

fn print_comparison(variants: &[Value], dropped: Option<&Value>) {
    let mut builder = Builder::default();
    let mut header = vec!["label"];
    header.extend(COMPARISON_COLUMNS);
    builder.push_record(header);
    for variant in variants {
        builder.push_record(comparison_row(variant));
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(labels)) = dropped {
        if !labels.is_empty() {
            println!("\nDropped (invalid after adjustment):");
            for label in labels {
                println!("  - {}", format_scalar(label));
            }
        }
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        _ => format_scalar(value),
    }
}
