use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Monetary values, in millions. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages on a 0–100 scale (15 = 15%). Never fractions.
pub type Percent = Decimal;

pub const HUNDRED: Decimal = dec!(100);

/// Decimal places kept for money (cents).
pub const MONEY_DP: u32 = 2;

/// Decimal places kept for percentages.
pub const PERCENT_DP: u32 = 6;

/// Round a money amount to cents, half away from zero, always carrying two
/// decimal places.
pub fn round_money(value: Money) -> Money {
    let mut rounded = value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DP);
    rounded
}

/// Round a percentage to the internal 6 dp granularity, half away from zero.
pub fn round_pct(value: Percent) -> Percent {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// `value` as a fraction of the space left after `taken` percent is issued,
/// i.e. `value × (100 − taken) / 100`. Nothing is left once `taken` reaches 100.
pub fn scale_remaining(value: Percent, taken: Percent) -> Percent {
    value * (HUNDRED - taken).max(Decimal::ZERO) / HUNDRED
}

/// `part / whole × 100`, or `None` when the ratio leaves Decimal's range
/// (a vanishingly small `whole`).
pub fn percent_of(part: Money, whole: Money) -> Option<Percent> {
    part.checked_div(whole)?.checked_mul(HUNDRED)
}

/// Standard computation output envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no timing so identical inputs
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
