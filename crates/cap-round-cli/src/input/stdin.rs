use serde_json::Value;
use std::io::{self, Read};

/// Read a piped round from stdin, as JSON or, failing that, YAML.
/// Returns None when stdin is interactive or nothing was piped.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(round) => Ok(Some(round)),
        Err(json_err) => match serde_yaml::from_str::<Value>(trimmed) {
            // A bare YAML scalar is almost always broken JSON, so report the JSON error
            Ok(round) if round.is_object() => Ok(Some(round)),
            _ => Err(format!("Failed to parse round from stdin: {json_err}").into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pipe_is_no_input() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_round() {
        let round = parse_piped(r#"{"post_money_valuation": 13, "round_size": 3}"#)
            .unwrap()
            .unwrap();
        assert_eq!(round["round_size"], 3);
    }

    #[test]
    fn test_yaml_round() {
        let round = parse_piped("post_money_valuation: 13\nround_size: 3\n")
            .unwrap()
            .unwrap();
        assert_eq!(round["post_money_valuation"], 13);
    }

    #[test]
    fn test_truncated_json_reports_json_error() {
        let err = parse_piped(r#"{"round_size": "#).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }
}
