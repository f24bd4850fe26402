#![cfg(feature = "scenario_set")]

use cap_round_core::engine::input::{Founder, RoundInput};
use cap_round_core::scenarios::variations::{compute_scenario_set, PERTURBATIONS};
use rust_decimal_macros::dec;

fn seed_round() -> RoundInput {
    RoundInput {
        post_money_valuation: dec!(8),
        round_size: dec!(2),
        lead_investor_amount: dec!(1.5),
        other_allocation_amount: dec!(0.5),
        lead_investor_name: "Lead".into(),
        show_advanced: true,
        founders: vec![Founder::new("Alice", dec!(50)), Founder::new("Bob", dec!(40))],
        current_pool_percent: dec!(10),
        target_pool_percent: dec!(12),
        ..Default::default()
    }
}

#[test]
fn test_set_is_base_plus_ten() {
    assert_eq!(PERTURBATIONS.len(), 10);
    let out = compute_scenario_set(&seed_round()).unwrap().result;
    assert_eq!(out.scenarios.len(), 11);
    assert_eq!(out.scenarios[0].result.post_money_valuation, dec!(8));
}

#[test]
fn test_every_variant_reconciles() {
    let out = compute_scenario_set(&seed_round()).unwrap().result;
    for s in &out.scenarios {
        assert!(
            (s.result.total_ownership - dec!(100)).abs() < dec!(0.5),
            "{}: {}",
            s.label,
            s.result.total_ownership
        );
    }
}

#[test]
fn test_set_is_deterministic() {
    let a = serde_json::to_string(&compute_scenario_set(&seed_round()).unwrap()).unwrap();
    let b = serde_json::to_string(&compute_scenario_set(&seed_round()).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_small_post_money_drops_low_valuations() {
    let mut input = seed_round();
    input.post_money_valuation = dec!(3);
    let out = compute_scenario_set(&input).unwrap().result;
    // 0.5x valuation -> 1.5 is not above a round of 2; a 1.5x round -> 3 is not below 3
    for label in ["Valuation 0.5x", "Round Size 1.5x"] {
        assert!(out.dropped.contains(&label.to_string()), "{label} should drop");
    }
    assert!(out.scenarios.iter().any(|s| s.label == "Valuation 0.75x"));
    assert_eq!(out.scenarios.len() + out.dropped.len(), 11);
}
