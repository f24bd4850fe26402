use serde_json::Value;
use std::io;

use super::{comparison_row, format_scalar, COMPARISON_COLUMNS};

/// Write output as CSV to stdout.
///
/// A scenario becomes a flat `holder,field,value` listing so every holder
/// row survives; a scenario set becomes one row per variant.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value.get("result") {
        Some(Value::Object(result)) => {
            if let Some(Value::Array(variants)) = result.get("scenarios") {
                let mut header = vec!["label"];
                header.extend(COMPARISON_COLUMNS);
                let _ = wtr.write_record(&header);
                for variant in variants {
                    let _ = wtr.write_record(comparison_row(variant));
                }
            } else {
                let _ = wtr.write_record(["section", "field", "value"]);
                write_flat(&mut wtr, "round", &Value::Object(result.clone()));
            }
        }
        _ => {
            let _ = wtr.write_record(["section", "field", "value"]);
            write_flat(&mut wtr, "", value);
        }
    }

    let _ = wtr.flush();
}

fn write_flat(wtr: &mut csv::Writer<io::StdoutLock<'_>>, section: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(_) => write_flat(wtr, key, val),
                    Value::Array(items) if items.iter().all(Value::is_object) => {
                        for (i, item) in items.iter().enumerate() {
                            write_flat(wtr, &format!("{key}[{i}]"), item);
                        }
                    }
                    _ => {
                        let _ = wtr.write_record([section, key.as_str(), &format_csv_value(val)]);
                    }
                }
            }
        }
        _ => {
            let _ = wtr.write_record([section, "", &format_csv_value(value)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        _ => format_scalar(value),
    }
}
