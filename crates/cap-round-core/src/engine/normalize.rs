use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::{Founder, PoolTiming, PriorInvestor, RoundInput, SafeNote};
use crate::types::{Money, Percent};

/// The inputs the calculation stages actually see, after the `show_advanced`
/// switch has been applied. Stages never look at the switch themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveInput {
    pub post_money_valuation: Money,
    pub pre_money_valuation: Money,
    pub round_size: Money,
    pub lead_investor_amount: Money,
    pub other_allocation_amount: Money,
    pub lead_investor_name: String,
    pub prior_investors: Vec<PriorInvestor>,
    pub founders: Vec<Founder>,
    pub safe_notes: Vec<SafeNote>,
    pub current_pool_percent: Percent,
    pub target_pool_percent: Percent,
    pub pool_timing: PoolTiming,
}

impl EffectiveInput {
    /// Pre-round ownership claimed by named holders and the existing pool.
    pub fn claimed_ownership(&self) -> Percent {
        let investors: Decimal = self
            .prior_investors
            .iter()
            .map(|i| i.ownership_percent)
            .sum();
        let founders: Decimal = self.founders.iter().map(|f| f.ownership_percent).sum();
        investors + founders + self.current_pool_percent
    }
}

/// Apply the `show_advanced` switch and tidy names.
pub fn normalize(input: &RoundInput) -> EffectiveInput {
    let (prior_investors, founders, safe_notes, current_pool, target_pool): (
        Vec<PriorInvestor>,
        Vec<Founder>,
        Vec<SafeNote>,
        Percent,
        Percent,
    ) = if input.show_advanced {
        (
            input
                .prior_investors
                .iter()
                .map(|i| PriorInvestor {
                    name: i.name.trim().to_string(),
                    ..i.clone()
                })
                .collect(),
            input
                .founders
                .iter()
                .map(|f| Founder {
                    name: f.name.trim().to_string(),
                    ..f.clone()
                })
                .collect(),
            input.safe_notes.clone(),
            input.current_pool_percent,
            input.target_pool_percent,
        )
    } else {
        (Vec::new(), Vec::new(), Vec::new(), Decimal::ZERO, Decimal::ZERO)
    };

    EffectiveInput {
        post_money_valuation: input.post_money_valuation,
        pre_money_valuation: input.pre_money_valuation(),
        round_size: input.round_size,
        lead_investor_amount: input.lead_investor_amount,
        other_allocation_amount: input.other_allocation_amount,
        lead_investor_name: input.lead_investor_name.trim().to_string(),
        prior_investors,
        founders,
        safe_notes,
        current_pool_percent: current_pool,
        target_pool_percent: target_pool,
        pool_timing: input.pool_timing,
    }
}
