use serde_json::Value;
use std::io::{self, Write};

/// Write the envelope, error record or scenario set as pretty JSON.
/// Decimals are already strings, so figures print exactly as computed.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut out, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(out));
    if let Err(e) = written {
        eprintln!("Failed to write JSON output: {}", e);
    }
}
