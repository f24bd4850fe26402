use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::esop::EsopOutput;
use super::input::{Founder, PriorInvestor};
use super::pro_rata::ProRataOutput;
use super::safe::{SafeConversion, SafeConversionOutput};
use crate::error::CapRoundError;
use crate::types::{percent_of, round_pct, scale_remaining, Money, Percent, HUNDRED};
use crate::CapRoundResult;

/// A founder's position after the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FounderOwnership {
    pub id: String,
    pub name: String,
    pub pre_round_percent: Percent,
    pub post_round_percent: Percent,
    pub dilution: Percent,
}

/// A prior investor's position after the round, pro-rata participation included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorInvestorOwnership {
    pub id: String,
    pub name: String,
    pub pre_round_percent: Percent,
    pub pro_rata_amount: Money,
    /// Ownership bought with the pro-rata amount, at post-money.
    pub pro_rata_percent: Percent,
    pub post_round_percent: Percent,
    /// `pre − post`; negative when pro-rata more than offsets dilution.
    pub dilution: Percent,
}

/// Input to the distributor: the outputs of every earlier stage.
#[derive(Debug, Clone, Copy)]
pub struct DistributionInput<'a> {
    pub founders: &'a [Founder],
    pub prior_investors: &'a [PriorInvestor],
    pub pro_rata: &'a ProRataOutput,
    pub safes: &'a SafeConversionOutput,
    pub esop: &'a EsopOutput,
    pub round_percent: Percent,
    pub post_money_valuation: Money,
}

/// The fully resolved cap table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionOutput {
    pub founders: Vec<FounderOwnership>,
    pub prior_investors: Vec<PriorInvestorOwnership>,
    /// SAFE conversions with their final, post-pool ownership filled in.
    pub safe_conversions: Vec<SafeConversion>,
    /// Round + SAFEs + pre-close top-up: what existing holders are diluted by.
    pub total_new_ownership: Percent,
    pub final_round_percent: Percent,
    pub final_safe_percent: Percent,
    /// Pro-rata ownership, which is part of the round percent as well.
    pub final_pro_rata_percent: Percent,
    pub final_pool_percent: Percent,
    pub total_ownership: Percent,
    /// Ownership no entered holder accounts for.
    pub unknown_ownership: Percent,
}

/// Dilute every existing holder and reconcile the post-round cap table.
///
/// Each holder is computed and rounded on its own, so one holder's rounding
/// error never lands on another. Fails only when a pro-rata amount is worth
/// more than the whole post-money valuation.
pub fn distribute_ownership(input: DistributionInput<'_>) -> CapRoundResult<DistributionOutput> {
    let post_close = input.esop.post_close_top_up;
    let total_new = input.round_percent + input.safes.total_safe_percent + input.esop.pre_close_top_up;

    let after_post_close = |pct: Decimal| scale_remaining(pct, post_close);

    let founders: Vec<FounderOwnership> = input
        .founders
        .iter()
        .map(|f| {
            let post = round_pct(after_post_close(scale_remaining(f.ownership_percent, total_new)));
            FounderOwnership {
                id: f.id.clone(),
                name: f.name.clone(),
                pre_round_percent: f.ownership_percent,
                post_round_percent: post,
                dilution: f.ownership_percent - post,
            }
        })
        .collect();

    let mut final_pro_rata = Decimal::ZERO;
    let prior_investors: Vec<PriorInvestorOwnership> = input
        .prior_investors
        .iter()
        .zip(input.pro_rata.allocations.iter())
        .map(|(inv, alloc)| -> CapRoundResult<PriorInvestorOwnership> {
            // A pro-rata stake can never exceed the whole company
            let pro_rata_pct = percent_of(alloc.effective_amount, input.post_money_valuation)
                .filter(|pct| *pct <= HUNDRED)
                .ok_or_else(|| CapRoundError::InvalidInput {
                    field: "post_money_valuation".into(),
                    reason: format!(
                        "Pro-rata amount {} is more than the whole post-money valuation {}",
                        alloc.effective_amount, input.post_money_valuation
                    ),
                })?;
            final_pro_rata += round_pct(after_post_close(pro_rata_pct));

            // Pro-rata is part of the post-round table, so a post-close top-up dilutes it too
            let post = round_pct(after_post_close(
                scale_remaining(inv.ownership_percent, total_new) + pro_rata_pct,
            ));
            Ok(PriorInvestorOwnership {
                id: inv.id.clone(),
                name: inv.name.clone(),
                pre_round_percent: inv.ownership_percent,
                pro_rata_amount: alloc.effective_amount,
                pro_rata_percent: round_pct(pro_rata_pct),
                post_round_percent: post,
                dilution: inv.ownership_percent - post,
            })
        })
        .collect::<CapRoundResult<_>>()?;

    let safe_conversions: Vec<SafeConversion> = input
        .safes
        .conversions
        .iter()
        .map(|c| SafeConversion {
            post_round_percent: round_pct(after_post_close(c.percent)),
            ..c.clone()
        })
        .collect();

    let final_round = round_pct(after_post_close(input.round_percent));
    let final_safe: Decimal = safe_conversions.iter().map(|c| c.post_round_percent).sum();
    let final_pool = input.esop.final_pool_percent;
    let founders_total: Decimal = founders.iter().map(|f| f.post_round_percent).sum();
    let investors_total: Decimal = prior_investors.iter().map(|i| i.post_round_percent).sum();

    let total_ownership = round_pct(
        final_round + final_safe + founders_total + investors_total + final_pool - final_pro_rata,
    );

    Ok(DistributionOutput {
        founders,
        prior_investors,
        safe_conversions,
        total_new_ownership: round_pct(total_new),
        final_round_percent: final_round,
        final_safe_percent: final_safe,
        final_pro_rata_percent: final_pro_rata,
        final_pool_percent: final_pool,
        total_ownership,
        unknown_ownership: HUNDRED - total_ownership,
    })
}
