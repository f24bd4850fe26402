use cap_round_core::engine::input::{Founder, PoolTiming, PriorInvestor, RoundInput, SafeNote};
use cap_round_core::engine::outcome::{respond_json, ErrorResult};
use cap_round_core::engine::scenario::compute_scenario;
use cap_round_core::CapRoundError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
    (a - b).abs() <= tol
}

fn series_a() -> RoundInput {
    RoundInput {
        post_money_valuation: dec!(13),
        round_size: dec!(3),
        lead_investor_amount: dec!(2.5),
        other_allocation_amount: dec!(0.5),
        lead_investor_name: "Lead Capital".into(),
        show_advanced: true,
        prior_investors: vec![
            PriorInvestor::new("Seed Fund", dec!(12), true),
            PriorInvestor::new("Angel", dec!(3), false),
        ],
        founders: vec![Founder::new("Alice", dec!(40)), Founder::new("Bob", dec!(35))],
        safe_notes: vec![SafeNote::new(dec!(0.5), dec!(7), dec!(20))],
        current_pool_percent: dec!(10),
        target_pool_percent: dec!(15),
        pool_timing: PoolTiming::PreClose,
    }
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_e2e_single_founder() {
    let input = RoundInput {
        post_money_valuation: dec!(13),
        round_size: dec!(3),
        lead_investor_amount: dec!(2.75),
        other_allocation_amount: dec!(0.25),
        show_advanced: true,
        founders: vec![Founder::new("Founder", dec!(70))],
        ..Default::default()
    };
    let r = compute_scenario(&input).unwrap().result;
    assert!(close(r.round_percent, dec!(23.08), dec!(0.01)));
    assert!(close(r.founders[0].post_round_percent, dec!(53.84), dec!(0.01)));
    assert!(close(r.founders[0].dilution, dec!(16.16), dec!(0.01)));
}

#[test]
fn test_safe_cap_wins_tie_break() {
    let r = compute_scenario(&series_a()).unwrap().result;
    // pre-money 10: discount price 8, cap 7
    assert_eq!(r.safe_conversions[0].conversion_price, dec!(7));
    assert_eq!(r.safe_conversions[0].index, 1);
}

// ===========================================================================
// Invariants
// ===========================================================================

#[test]
fn test_full_cap_table_reconciles_both_timings() {
    for timing in [PoolTiming::PreClose, PoolTiming::PostClose] {
        let mut input = series_a();
        input.pool_timing = timing;
        let r = compute_scenario(&input).unwrap().result;
        assert!(
            close(r.total_ownership, dec!(100), dec!(0.5)),
            "{timing:?}: total ownership {}",
            r.total_ownership
        );
        assert!(close(r.esop.final_pool_percent, dec!(15), dec!(0.0001)));
        assert_eq!(r.unknown_ownership, dec!(100) - r.total_ownership);
    }
}

#[test]
fn test_reconciles_without_target_pool() {
    let mut input = series_a();
    input.target_pool_percent = Decimal::ZERO;
    let r = compute_scenario(&input).unwrap().result;
    assert!(close(r.total_ownership, dec!(100), dec!(0.001)));
    assert_eq!(r.esop.top_up_percent, Decimal::ZERO);
}

#[test]
fn test_reconciles_when_target_already_met() {
    let mut input = series_a();
    input.current_pool_percent = dec!(25);
    input.founders = vec![Founder::new("Alice", dec!(30)), Founder::new("Bob", dec!(30))];
    input.target_pool_percent = dec!(10);
    let r = compute_scenario(&input).unwrap().result;
    assert!(r.esop.target_already_met);
    assert!(close(r.total_ownership, dec!(100), dec!(0.001)));
}

#[test]
fn test_partial_cap_table_leaves_unknown_gap() {
    let mut input = series_a();
    input.founders.pop();
    let r = compute_scenario(&input).unwrap().result;
    assert!(r.unknown_ownership > dec!(10));
    assert_eq!(r.total_ownership + r.unknown_ownership, dec!(100));
}

#[test]
fn test_idempotent_serialization() {
    let input = series_a();
    let a = serde_json::to_string(&compute_scenario(&input).unwrap()).unwrap();
    let b = serde_json::to_string(&compute_scenario(&input).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_ids_pass_through_unchanged() {
    let mut input = series_a();
    input.founders[0].id = "founder-abc".into();
    input.prior_investors[0].id = "inv-7".into();
    input.safe_notes[0].id = "safe-1".into();
    let r = compute_scenario(&input).unwrap().result;
    assert_eq!(r.founders[0].id, "founder-abc");
    assert_eq!(r.prior_investors[0].id, "inv-7");
    assert_eq!(r.pro_rata.allocations[0].investor_id, "inv-7");
    assert_eq!(r.safe_conversions[0].note_id, "safe-1");
    assert_eq!(r.founders[1].id, "");
}

#[test]
fn test_founder_split_invariance() {
    let mut single = series_a();
    single.founders = vec![Founder::new("Alice", dec!(75))];
    let mut split = series_a();
    split.founders = vec![Founder::new("Alice", dec!(45)), Founder::new("Bob", dec!(30))];

    let a = compute_scenario(&single).unwrap().result;
    let b = compute_scenario(&split).unwrap().result;

    let combined: Decimal = b.founders.iter().map(|f| f.post_round_percent).sum();
    let combined_dilution: Decimal = b.founders.iter().map(|f| f.dilution).sum();
    assert!(close(combined, a.founders[0].post_round_percent, dec!(0.000002)));
    assert!(close(combined_dilution, a.founders[0].dilution, dec!(0.000002)));

    // Each founder carries only its own rounding: the ratio of post to pre
    // is the same for both within one rounding unit.
    let factor_a = b.founders[0].post_round_percent / dec!(45);
    let factor_b = b.founders[1].post_round_percent / dec!(30);
    assert!(close(factor_a, factor_b, dec!(0.0000001)));
}

// ===========================================================================
// Pro-rata boundary
// ===========================================================================

#[test]
fn test_pro_rata_exactly_available() {
    let mut input = series_a();
    // Seed 12% of 3 = 0.36
    input.other_allocation_amount = dec!(0.36);
    input.lead_investor_amount = dec!(2.64);
    let r = compute_scenario(&input).unwrap().result;
    assert_eq!(r.other_amount, Decimal::ZERO);
    assert_eq!(r.other_percent, Decimal::ZERO);
}

#[test]
fn test_pro_rata_one_cent_over() {
    let mut input = series_a();
    input.other_allocation_amount = dec!(0.35);
    input.lead_investor_amount = dec!(2.65);
    let err = compute_scenario(&input).unwrap_err();
    assert!(err.is_recoverable());
    let record = ErrorResult::from_error(&err).unwrap();
    assert!(record.error);
    assert_eq!(record.attempted_amount, Some(dec!(0.36)));
    assert_eq!(record.available_amount, Some(dec!(0.35)));
}

#[test]
fn test_lead_prior_investor_gets_no_pro_rata() {
    let mut input = series_a();
    input.prior_investors[0].name = "Lead Capital".into();
    let r = compute_scenario(&input).unwrap().result;
    assert!(r.pro_rata.allocations[0].is_lead_investor);
    assert_eq!(r.pro_rata.total_pro_rata_amount, Decimal::ZERO);
    assert_eq!(r.prior_investors[0].pro_rata_percent, Decimal::ZERO);
}

// ===========================================================================
// Boundary responses
// ===========================================================================

#[test]
fn test_invalid_inputs_respond_null() {
    let mut input = series_a();
    input.post_money_valuation = dec!(3);
    assert_eq!(respond_json(compute_scenario(&input)).unwrap(), "null");

    let mut input = series_a();
    input.founders.push(Founder::new("Carol", dec!(20)));
    assert!(matches!(
        compute_scenario(&input),
        Err(CapRoundError::OverSubscribed { .. })
    ));
    assert_eq!(respond_json(compute_scenario(&input)).unwrap(), "null");
}

#[test]
fn test_pro_rata_error_responds_with_record() {
    let mut input = series_a();
    input.other_allocation_amount = dec!(0.1);
    let json: serde_json::Value =
        serde_json::from_str(&respond_json(compute_scenario(&input)).unwrap()).unwrap();
    assert_eq!(json["error"], true);
    assert!(json["error_message"].as_str().unwrap().contains("0.36"));
}

#[test]
fn test_degenerate_safe_does_not_block_table() {
    let mut input = series_a();
    input
        .safe_notes
        .push(SafeNote::new(dec!(1), Decimal::ZERO, Decimal::ZERO));
    let out = compute_scenario(&input).unwrap();
    assert_eq!(out.result.safe_conversions.len(), 1);
    assert_eq!(out.result.skipped_safes[0].index, 2);
    assert!(out.warnings.iter().any(|w| w.contains("SAFE #2")));
}

#[test]
fn test_vanishing_safe_cap_is_skipped_not_fatal() {
    let mut input = series_a();
    input.safe_notes.push(SafeNote::new(
        dec!(1),
        dec!(0.0000000000000000000000000001),
        Decimal::ZERO,
    ));
    let out = compute_scenario(&input).unwrap();
    assert_eq!(out.result.safe_conversions.len(), 1);
    assert_eq!(out.result.skipped_safes[0].index, 2);
    assert!(close(out.result.total_ownership, dec!(100), dec!(0.001)));
}

#[test]
fn test_vanishing_post_money_responds_null() {
    let mut input = series_a();
    input.post_money_valuation = dec!(0.0000000000000000000000000002);
    input.round_size = dec!(0.0000000000000000000000000001);
    input.founders = vec![Founder::new("Alice", dec!(75))];
    input.safe_notes.clear();
    input.prior_investors[0].pro_rata_override = Some(dec!(0.5));
    assert_eq!(respond_json(compute_scenario(&input)).unwrap(), "null");
}

#[test]
fn test_round_and_safes_over_whole_company_still_computes() {
    let mut input = series_a();
    input.safe_notes = vec![
        SafeNote::new(dec!(9), dec!(10), Decimal::ZERO),
        SafeNote::new(dec!(9), dec!(10), Decimal::ZERO),
    ];
    let out = compute_scenario(&input).unwrap();
    let r = &out.result;
    assert!(r.founders.iter().all(|f| f.post_round_percent == Decimal::ZERO));
    assert_eq!(r.esop.final_pool_percent, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("take the whole company")));
}
