use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::distribution::{
    distribute_ownership, DistributionInput, FounderOwnership, PriorInvestorOwnership,
};
use super::esop::{solve_esop, EsopInput, EsopOutput};
use super::input::RoundInput;
use super::normalize::{normalize, EffectiveInput};
use super::pro_rata::{allocate_pro_rata, ProRataOutput};
use super::safe::{convert_safes, SafeConversion, SkippedSafe};
use crate::error::CapRoundError;
use crate::types::{percent_of, round_pct, with_metadata, ComputationOutput, Money, Percent, HUNDRED};
use crate::CapRoundResult;

/// Largest money figure (in millions) the engine accepts. Keeps every
/// intermediate product well inside Decimal's range.
pub const MAX_MONEY: Decimal = dec!(1_000_000_000_000);

/// Unattributed ownership above this is reported as a warning.
const UNKNOWN_OWNERSHIP_NOTICE: Decimal = dec!(0.5);

/// A fully resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub post_money_valuation: Money,
    pub pre_money_valuation: Money,
    pub round_size: Money,
    pub lead_investor_name: String,
    pub lead_investor_amount: Money,
    pub other_allocation_amount: Money,
    /// Non-lead allocation left for new investors once pro-rata is taken.
    pub other_amount: Money,
    /// Round as a share of post-money, before any post-close pool top-up.
    pub round_percent: Percent,
    pub lead_investor_percent: Percent,
    pub other_percent: Percent,
    pub final_round_percent: Percent,
    pub founders: Vec<FounderOwnership>,
    pub prior_investors: Vec<PriorInvestorOwnership>,
    pub pro_rata: ProRataOutput,
    pub safe_conversions: Vec<SafeConversion>,
    pub skipped_safes: Vec<SkippedSafe>,
    pub total_safe_amount: Money,
    pub total_safe_percent: Percent,
    pub final_safe_percent: Percent,
    pub esop: EsopOutput,
    pub total_new_ownership: Percent,
    pub total_ownership: Percent,
    pub unknown_ownership: Percent,
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> CapRoundError {
    CapRoundError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

fn check_money(field: &str, value: Money) -> CapRoundResult<()> {
    if value.abs() > MAX_MONEY {
        return Err(invalid(
            field,
            format!("Amount {value} exceeds the supported maximum of {MAX_MONEY}"),
        ));
    }
    Ok(())
}

fn check_percent(field: &str, value: Percent) -> CapRoundResult<()> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(invalid(
            field,
            format!("Percentage {value} must be between 0 and 100"),
        ));
    }
    Ok(())
}

fn validate_round(input: &RoundInput) -> CapRoundResult<()> {
    check_money("post_money_valuation", input.post_money_valuation)?;
    check_money("round_size", input.round_size)?;
    check_money("lead_investor_amount", input.lead_investor_amount)?;
    check_money("other_allocation_amount", input.other_allocation_amount)?;

    if input.post_money_valuation <= Decimal::ZERO {
        return Err(invalid(
            "post_money_valuation",
            "Post-money valuation must be positive",
        ));
    }
    if input.round_size <= Decimal::ZERO {
        return Err(invalid("round_size", "Round size must be positive"));
    }
    if input.post_money_valuation <= input.round_size {
        return Err(invalid(
            "post_money_valuation",
            format!(
                "Post-money valuation ({}) must exceed the round size ({})",
                input.post_money_valuation, input.round_size
            ),
        ));
    }
    Ok(())
}

fn validate_effective(eff: &EffectiveInput) -> CapRoundResult<()> {
    for (i, f) in eff.founders.iter().enumerate() {
        check_percent(&format!("founders[{i}].ownership_percent"), f.ownership_percent)?;
    }
    for (i, inv) in eff.prior_investors.iter().enumerate() {
        check_percent(
            &format!("prior_investors[{i}].ownership_percent"),
            inv.ownership_percent,
        )?;
        if let Some(amount) = inv.pro_rata_override {
            check_money(&format!("prior_investors[{i}].pro_rata_override"), amount)?;
        }
    }
    for (i, note) in eff.safe_notes.iter().enumerate() {
        check_money(&format!("safe_notes[{i}].amount"), note.amount)?;
        check_money(&format!("safe_notes[{i}].valuation_cap"), note.valuation_cap)?;
        // Out-of-range discounts are left to the converter to filter
        if note.discount_percent.abs() > MAX_MONEY {
            return Err(invalid(
                format!("safe_notes[{i}].discount_percent"),
                "Discount is out of range",
            ));
        }
    }
    check_percent("current_pool_percent", eff.current_pool_percent)?;
    check_percent("target_pool_percent", eff.target_pool_percent)?;

    let claimed = eff.claimed_ownership();
    if claimed > HUNDRED {
        tracing::warn!(total = %claimed, "pre-round ownership exceeds 100%");
        return Err(CapRoundError::OverSubscribed { total: claimed });
    }
    Ok(())
}

fn share_of_post(field: &str, amount: Money, post_money: Money) -> CapRoundResult<Percent> {
    percent_of(amount, post_money).ok_or_else(|| {
        invalid(
            field,
            format!("Amount {amount} is too large relative to post-money valuation {post_money}"),
        )
    })
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Resolve one round into a full post-round cap table.
///
/// Stages run in a fixed order, each feeding the next: pro-rata allocation,
/// SAFE conversion, option-pool sizing, then ownership distribution. The
/// computation is pure; the same input always yields the same output.
pub fn compute_scenario(input: &RoundInput) -> CapRoundResult<ComputationOutput<ScenarioResult>> {
    let mut warnings: Vec<String> = Vec::new();

    // ── Validation ───────────────────────────────────────────────────
    validate_round(input)?;
    let eff = normalize(input);
    validate_effective(&eff)?;

    // ── Stage 1: pro-rata ────────────────────────────────────────────
    let pro_rata = allocate_pro_rata(
        &eff.prior_investors,
        eff.round_size,
        &eff.lead_investor_name,
        eff.other_allocation_amount,
        &mut warnings,
    )?;

    // ── Stage 2: SAFEs ───────────────────────────────────────────────
    let safes = convert_safes(&eff.safe_notes, eff.pre_money_valuation, &mut warnings);

    let round_percent = round_pct(eff.round_size / eff.post_money_valuation * HUNDRED);
    let base_dilution = round_percent + safes.total_safe_percent;
    if base_dilution >= HUNDRED {
        tracing::warn!(%round_percent, safe_percent = %safes.total_safe_percent, "new issuance takes the whole company");
        warnings.push(format!(
            "Round ({round_percent}%) and SAFE conversions ({}%) take the whole company: existing holders are left with 0%",
            safes.total_safe_percent
        ));
    }

    // ── Stage 3: option pool ─────────────────────────────────────────
    let esop = solve_esop(&EsopInput {
        current_pool_percent: eff.current_pool_percent,
        target_pool_percent: eff.target_pool_percent,
        timing: eff.pool_timing,
        base_dilution_percent: base_dilution,
    });
    if esop.top_up_capped {
        warnings.push(format!(
            "Option pool top-up limited to {}%: the round and SAFEs leave no more room",
            esop.top_up_percent
        ));
    }

    // ── Stage 4: distribution ────────────────────────────────────────
    let dist = distribute_ownership(DistributionInput {
        founders: &eff.founders,
        prior_investors: &eff.prior_investors,
        pro_rata: &pro_rata,
        safes: &safes,
        esop: &esop,
        round_percent,
        post_money_valuation: eff.post_money_valuation,
    })?;

    if dist.unknown_ownership.abs() > UNKNOWN_OWNERSHIP_NOTICE {
        warnings.push(format!(
            "{}% of post-round ownership is not attributed to any entered holder",
            dist.unknown_ownership.round_dp(2)
        ));
    }

    // ── Assemble output ──────────────────────────────────────────────
    let post = eff.post_money_valuation;
    let output = ScenarioResult {
        post_money_valuation: post,
        pre_money_valuation: eff.pre_money_valuation,
        round_size: eff.round_size,
        lead_investor_name: eff.lead_investor_name.clone(),
        lead_investor_amount: eff.lead_investor_amount,
        other_allocation_amount: eff.other_allocation_amount,
        other_amount: pro_rata.remaining_other_amount,
        round_percent,
        lead_investor_percent: round_pct(share_of_post("lead_investor_amount", eff.lead_investor_amount, post)?),
        other_percent: round_pct(share_of_post("other_allocation_amount", pro_rata.remaining_other_amount, post)?),
        final_round_percent: dist.final_round_percent,
        founders: dist.founders,
        prior_investors: dist.prior_investors,
        pro_rata,
        safe_conversions: dist.safe_conversions,
        skipped_safes: safes.skipped,
        total_safe_amount: safes.total_safe_amount,
        total_safe_percent: safes.total_safe_percent,
        final_safe_percent: dist.final_safe_percent,
        esop,
        total_new_ownership: dist.total_new_ownership,
        total_ownership: dist.total_ownership,
        unknown_ownership: dist.unknown_ownership,
    };

    Ok(with_metadata(
        "Priced Round Cap Table (pro-rata, SAFE conversion, closed-form option pool)",
        &serde_json::json!({
            "post_money_valuation": input.post_money_valuation.to_string(),
            "round_size": input.round_size.to_string(),
            "show_advanced": input.show_advanced,
            "pool_timing": format!("{:?}", input.pool_timing),
            "num_founders": eff.founders.len(),
            "num_prior_investors": eff.prior_investors.len(),
            "num_safe_notes": eff.safe_notes.len(),
        }),
        warnings,
        output,
    ))
}
