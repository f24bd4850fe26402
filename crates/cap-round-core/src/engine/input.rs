use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// When new option-pool shares are issued relative to the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolTiming {
    /// Pool is topped up before the round closes; the top-up dilutes existing
    /// holders (including the existing pool) but not the new money.
    #[default]
    PreClose,
    /// Pool is topped up on the post-round cap table; everyone is diluted,
    /// new investors included.
    PostClose,
}

// ─── Structs ─────────────────────────────────────────────────────────────────

/// An investor from an earlier round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorInvestor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Pre-round stake, 0–100.
    #[serde(default)]
    pub ownership_percent: Percent,
    #[serde(default)]
    pub has_pro_rata_right: bool,
    /// Explicit dollar amount the investor takes in this round, overriding the
    /// calculated pro-rata. `Some(0)` means the investor declines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_rata_override: Option<Money>,
}

/// A founder. Founders never put money into the modelled round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Founder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Pre-round stake, 0–100.
    #[serde(default)]
    pub ownership_percent: Percent,
}

/// A SAFE converting in this round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeNote {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub amount: Money,
    /// Valuation cap; zero means uncapped.
    #[serde(default)]
    pub valuation_cap: Money,
    /// Discount to the round price, 0–100; zero means no discount.
    #[serde(default)]
    pub discount_percent: Percent,
}

/// Everything the engine needs to resolve one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundInput {
    pub post_money_valuation: Money,
    pub round_size: Money,
    #[serde(default)]
    pub lead_investor_amount: Money,
    #[serde(default)]
    pub other_allocation_amount: Money,
    #[serde(default)]
    pub lead_investor_name: String,
    /// Master switch: when false every field below is treated as empty/zero.
    #[serde(default)]
    pub show_advanced: bool,
    #[serde(default)]
    pub prior_investors: Vec<PriorInvestor>,
    #[serde(default)]
    pub founders: Vec<Founder>,
    #[serde(default)]
    pub safe_notes: Vec<SafeNote>,
    #[serde(default)]
    pub current_pool_percent: Percent,
    #[serde(default)]
    pub target_pool_percent: Percent,
    #[serde(default)]
    pub pool_timing: PoolTiming,
}

impl RoundInput {
    pub fn pre_money_valuation(&self) -> Money {
        self.post_money_valuation - self.round_size
    }
}

impl Founder {
    pub fn new(name: &str, ownership_percent: Decimal) -> Self {
        Founder {
            id: String::new(),
            name: name.into(),
            ownership_percent,
        }
    }
}

impl PriorInvestor {
    pub fn new(name: &str, ownership_percent: Decimal, has_pro_rata_right: bool) -> Self {
        PriorInvestor {
            id: String::new(),
            name: name.into(),
            ownership_percent,
            has_pro_rata_right,
            pro_rata_override: None,
        }
    }
}

impl SafeNote {
    pub fn new(amount: Money, valuation_cap: Money, discount_percent: Percent) -> Self {
        SafeNote {
            id: String::new(),
            amount,
            valuation_cap,
            discount_percent,
        }
    }
}
