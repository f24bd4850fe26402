mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use cap_round_core::engine::outcome::ErrorResult;
use cap_round_core::CapRoundError;
use commands::scenario::{ScenarioArgs, ScenarioSetArgs, ValidateArgs};

/// Environment variable holding a tracing filter, e.g. `cap_round_core=debug`.
const LOG_ENV: &str = "CAP_ROUND_LOG";

/// Startup round and cap-table scenario calculations
#[derive(Parser)]
#[command(
    name = "capround",
    version,
    about = "Startup round and cap-table scenario calculations",
    long_about = "Resolve a priced round into a post-round cap table with decimal precision: \
                  pro-rata participation, SAFE conversion, option-pool top-ups and \
                  valuation / round-size what-ifs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions (skipped SAFEs, dropped variants) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one round into a post-round cap table
    Scenario(ScenarioArgs),
    /// Run the base round plus valuation and round-size variations
    ScenarioSet(ScenarioSetArgs),
    /// Check a saved round for shape problems without calculating
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Scenario(args) => commands::scenario::run_scenario(args),
        Commands::ScenarioSet(args) => commands::scenario::run_scenario_set(args),
        Commands::Validate(args) => commands::scenario::run_validate(args),
        Commands::Version => {
            println!("capround {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            if let Some(engine_err) = e.downcast_ref::<CapRoundError>() {
                match ErrorResult::from_error(engine_err) {
                    Some(record) => {
                        let value = serde_json::to_value(record).unwrap_or_default();
                        output::format_output(&cli.output, &value);
                    }
                    None => println!("null"),
                }
            }
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
