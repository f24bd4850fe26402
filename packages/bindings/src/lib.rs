use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::Value;

use cap_round_core::engine::outcome::respond_json;
use cap_round_core::scenarios::variations::compute_scenario_set as scenario_set;
use cap_round_core::validation::{self, parse_round_input};
use cap_round_core::engine::input::RoundInput;
use cap_round_core::{engine::scenario, CapRoundError, CapRoundResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Unparseable or mis-shaped input is reported as a `null` result, matching
/// what the engine returns for any other invalid round.
fn run<T: serde::Serialize>(
    input_json: &str,
    compute: impl FnOnce(&RoundInput) -> CapRoundResult<T>,
) -> NapiResult<String> {
    let result = serde_json::from_str::<Value>(input_json)
        .map_err(CapRoundError::from)
        .and_then(parse_round_input)
        .and_then(|(round, _warnings)| compute(&round));
    respond_json(result).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cap table
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_scenario(input_json: String) -> NapiResult<String> {
    run(&input_json, scenario::compute_scenario)
}

#[napi]
pub fn compute_scenario_set(input_json: String) -> NapiResult<String> {
    run(&input_json, scenario_set)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_round_data(input_json: String) -> NapiResult<String> {
    let data: Value = serde_json::from_str(&input_json).unwrap_or(Value::Null);
    let report = validation::validate_round_data(&data);
    serde_json::to_string(&report).map_err(to_napi_error)
}
