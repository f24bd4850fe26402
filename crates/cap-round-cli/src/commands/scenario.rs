use clap::Args;
use serde_json::Value;

use cap_round_core::engine::scenario;
use cap_round_core::scenarios::variations;
use cap_round_core::validation;

use crate::input;

/// Arguments for a single round calculation
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the scenario comparison set
#[derive(Args)]
pub struct ScenarioSetArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for input validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

fn read_input(path: &Option<String>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        input::file::read_value(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(data)
    } else {
        Err(format!("--input <file.json> or stdin required for {what}").into())
    }
}

pub fn run_scenario(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = read_input(&args.input, "scenario calculation")?;
    let (round, _warnings) = validation::parse_round_input(data)?;
    let result = scenario::compute_scenario(&round)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenario_set(args: ScenarioSetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = read_input(&args.input, "scenario set")?;
    let (round, _warnings) = validation::parse_round_input(data)?;
    let result = variations::compute_scenario_set(&round)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = read_input(&args.input, "validation")?;
    let report = validation::validate_round_data(&data);
    Ok(serde_json::to_value(report)?)
}
