use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::PriorInvestor;
use crate::error::CapRoundError;
use crate::types::{round_money, Money, Percent, HUNDRED};
use crate::CapRoundResult;

/// How much one prior investor draws from the non-lead allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProRataAllocation {
    pub investor_id: String,
    pub investor_name: String,
    pub ownership_percent: Percent,
    pub has_pro_rata_right: bool,
    /// Investor is also the round lead, so their money comes through the lead slot.
    pub is_lead_investor: bool,
    /// `ownership × round_size`, before any override.
    pub calculated_amount: Money,
    /// Amount actually taken.
    pub effective_amount: Money,
    pub is_overridden: bool,
    /// `effective − calculated`; positive when taking more than pro-rata.
    pub override_delta: Money,
}

/// Output of the pro-rata stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProRataOutput {
    /// One entry per prior investor, in input order.
    pub allocations: Vec<ProRataAllocation>,
    pub total_pro_rata_amount: Money,
    /// The non-lead allocation the pro-rata money is drawn from.
    pub available_amount: Money,
    /// Non-lead allocation left for new money after pro-rata.
    pub remaining_other_amount: Money,
}

fn is_lead(investor: &PriorInvestor, lead_investor_name: &str) -> bool {
    !lead_investor_name.is_empty() && investor.name.trim() == lead_investor_name.trim()
}

/// Work out each prior investor's participation in the round.
///
/// Pro-rata money comes out of `other_allocation_amount`. Oversubscription is
/// an error rather than a clamp: the caller has to change the inputs.
pub fn allocate_pro_rata(
    investors: &[PriorInvestor],
    round_size: Money,
    lead_investor_name: &str,
    other_allocation_amount: Money,
    warnings: &mut Vec<String>,
) -> CapRoundResult<ProRataOutput> {
    let mut allocations = Vec::with_capacity(investors.len());
    let mut total = Decimal::ZERO;

    for inv in investors {
        let lead = is_lead(inv, lead_investor_name);
        let eligible = !lead && inv.has_pro_rata_right && inv.ownership_percent > Decimal::ZERO;

        if !eligible {
            allocations.push(ProRataAllocation {
                investor_id: inv.id.clone(),
                investor_name: inv.name.clone(),
                ownership_percent: inv.ownership_percent,
                has_pro_rata_right: inv.has_pro_rata_right,
                is_lead_investor: lead,
                calculated_amount: Decimal::ZERO,
                effective_amount: Decimal::ZERO,
                is_overridden: false,
                override_delta: Decimal::ZERO,
            });
            continue;
        }

        let calculated = round_money(inv.ownership_percent / HUNDRED * round_size);
        let (effective, is_overridden) = match inv.pro_rata_override {
            Some(amount) if amount >= Decimal::ZERO => (round_money(amount), true),
            Some(amount) => {
                warnings.push(format!(
                    "Ignoring negative pro-rata override ({amount}) for '{}'; using calculated amount",
                    inv.name
                ));
                (calculated, false)
            }
            None => (calculated, false),
        };

        total += effective;
        allocations.push(ProRataAllocation {
            investor_id: inv.id.clone(),
            investor_name: inv.name.clone(),
            ownership_percent: inv.ownership_percent,
            has_pro_rata_right: true,
            is_lead_investor: false,
            calculated_amount: calculated,
            effective_amount: effective,
            is_overridden,
            override_delta: effective - calculated,
        });
    }

    if total > other_allocation_amount {
        tracing::warn!(
            attempted = %total,
            available = %other_allocation_amount,
            "pro-rata allocations exceed the non-lead allocation"
        );
        return Err(CapRoundError::ProRataExceedsAvailable {
            attempted: total,
            available: other_allocation_amount,
        });
    }

    Ok(ProRataOutput {
        allocations,
        total_pro_rata_amount: total,
        available_amount: other_allocation_amount,
        remaining_other_amount: other_allocation_amount - total,
    })
}
