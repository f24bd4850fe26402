use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::input::RoundInput;
use crate::engine::scenario::{compute_scenario, ScenarioResult};
use crate::types::{with_metadata, ComputationOutput};
use crate::CapRoundResult;

/// A what-if applied to the base round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    pub valuation_multiplier: Decimal,
    pub round_multiplier: Decimal,
}

/// The fixed comparison set, after the base case.
pub const PERTURBATIONS: [Perturbation; 10] = [
    Perturbation { valuation_multiplier: dec!(0.5), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: dec!(0.75), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: dec!(0.9), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: dec!(1.1), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: dec!(1.25), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: dec!(1.5), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: dec!(2.0), round_multiplier: Decimal::ONE },
    Perturbation { valuation_multiplier: Decimal::ONE, round_multiplier: dec!(0.5) },
    Perturbation { valuation_multiplier: Decimal::ONE, round_multiplier: dec!(1.5) },
    Perturbation { valuation_multiplier: dec!(1.5), round_multiplier: dec!(1.5) },
];

impl Perturbation {
    pub const BASE: Perturbation = Perturbation {
        valuation_multiplier: Decimal::ONE,
        round_multiplier: Decimal::ONE,
    };

    pub fn label(&self) -> String {
        let v = self.valuation_multiplier.normalize();
        let r = self.round_multiplier.normalize();
        match (v == Decimal::ONE, r == Decimal::ONE) {
            (true, true) => "Base Case".to_string(),
            (false, true) => format!("Valuation {v}x"),
            (true, false) => format!("Round Size {r}x"),
            (false, false) => format!("Valuation {v}x, Round Size {r}x"),
        }
    }

    /// Scale the base input. Lead and other allocations move with the round so
    /// they keep summing to it.
    pub fn apply(&self, base: &RoundInput) -> RoundInput {
        let r = self.round_multiplier;
        RoundInput {
            post_money_valuation: base.post_money_valuation * self.valuation_multiplier,
            round_size: base.round_size * r,
            lead_investor_amount: base.lead_investor_amount * r,
            other_allocation_amount: base.other_allocation_amount * r,
            ..base.clone()
        }
    }
}

/// One entry of the comparison set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioVariant {
    pub label: String,
    pub valuation_multiplier: Decimal,
    pub round_multiplier: Decimal,
    pub result: ScenarioResult,
}

/// Base case plus every perturbation that could be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSetOutput {
    pub scenarios: Vec<ScenarioVariant>,
    /// Labels of perturbations that produced invalid inputs.
    pub dropped: Vec<String>,
}

/// Run the base round and the fixed set of valuation / round-size what-ifs.
///
/// The base case must compute; its error is returned as-is. Perturbations
/// that fail for any reason are dropped from the set.
pub fn compute_scenario_set(
    input: &RoundInput,
) -> CapRoundResult<ComputationOutput<ScenarioSetOutput>> {
    let base = compute_scenario(input)?;
    let warnings = base.warnings.clone();

    let mut scenarios = Vec::with_capacity(PERTURBATIONS.len() + 1);
    scenarios.push(ScenarioVariant {
        label: Perturbation::BASE.label(),
        valuation_multiplier: Decimal::ONE,
        round_multiplier: Decimal::ONE,
        result: base.result,
    });

    let mut dropped = Vec::new();
    for p in PERTURBATIONS.iter() {
        let label = p.label();
        match compute_scenario(&p.apply(input)) {
            Ok(out) => scenarios.push(ScenarioVariant {
                label,
                valuation_multiplier: p.valuation_multiplier,
                round_multiplier: p.round_multiplier,
                result: out.result,
            }),
            Err(err) => {
                tracing::debug!(%label, error = %err, "dropping scenario variant");
                dropped.push(label);
            }
        }
    }

    let output = ScenarioSetOutput { scenarios, dropped };

    Ok(with_metadata(
        "Round Scenario Set (base case + valuation and round-size variations)",
        &serde_json::json!({
            "post_money_valuation": input.post_money_valuation.to_string(),
            "round_size": input.round_size.to_string(),
            "num_variations": PERTURBATIONS.len(),
        }),
        warnings,
        output,
    ))
}
