use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::PoolTiming;
use crate::types::{round_pct, scale_remaining, Percent, HUNDRED};

/// Below this the closed-form denominator is treated as degenerate (pool at or
/// near 100%) and the raw difference is used instead.
const MIN_DENOMINATOR: Decimal = dec!(0.01);

/// Input for the option-pool solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsopInput {
    pub current_pool_percent: Percent,
    pub target_pool_percent: Percent,
    pub timing: PoolTiming,
    /// Dilution from the round and the SAFEs, before the pool is considered.
    pub base_dilution_percent: Percent,
}

/// Outcome of sizing the option pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsopOutput {
    pub current_pool_percent: Percent,
    pub target_pool_percent: Percent,
    pub timing: PoolTiming,
    /// Existing pool after the round and SAFEs dilute it, with no top-up.
    pub naturally_diluted_percent: Percent,
    pub top_up_percent: Percent,
    pub pre_close_top_up: Percent,
    pub post_close_top_up: Percent,
    pub final_pool_percent: Percent,
    /// The top-up was limited to the space the round and SAFEs leave.
    pub top_up_capped: bool,
    /// Target was already met by the existing pool after natural dilution.
    pub target_already_met: bool,
}

/// Size the option-pool top-up needed to hit the target.
///
/// Issuing the top-up dilutes the pool itself, so the top-up is the solution
/// of one linear equation per timing convention:
///
/// ```text
/// pre-close:  c·(100 − B − X)/100 + X = T  →  X = (T − N) / (1 − c/100)
/// post-close: N·(100 − X)/100 + X     = T  →  X = (T − N) / (1 − N/100)
/// ```
///
/// where `c` is the current pool, `B` the base dilution, `N = c·(100 − B)/100`
/// the naturally diluted pool and `T` the target.
pub fn solve_esop(input: &EsopInput) -> EsopOutput {
    let current = input.current_pool_percent;
    let target = input.target_pool_percent;
    let base = input.base_dilution_percent;
    let natural = scale_remaining(current, base);

    let no_top_up = |target_already_met: bool| EsopOutput {
        current_pool_percent: current,
        target_pool_percent: target,
        timing: input.timing,
        naturally_diluted_percent: round_pct(natural),
        top_up_percent: Decimal::ZERO,
        pre_close_top_up: Decimal::ZERO,
        post_close_top_up: Decimal::ZERO,
        final_pool_percent: round_pct(natural),
        top_up_capped: false,
        target_already_met,
    };

    if target <= Decimal::ZERO {
        return no_top_up(false);
    }
    if target <= natural {
        // Existing grants are not cancelled; the pool stays at its diluted size
        return no_top_up(true);
    }

    let shortfall = target - natural;
    let denominator = match input.timing {
        PoolTiming::PreClose => Decimal::ONE - current / HUNDRED,
        PoolTiming::PostClose => Decimal::ONE - natural / HUNDRED,
    };
    let solved = if denominator <= MIN_DENOMINATOR {
        shortfall
    } else {
        shortfall / denominator
    };

    let headroom = (HUNDRED - base).max(Decimal::ZERO);
    let top_up_capped = solved > headroom;
    let top_up = round_pct(solved.min(headroom));

    let final_pool = match input.timing {
        PoolTiming::PreClose => scale_remaining(current, base + top_up) + top_up,
        PoolTiming::PostClose => scale_remaining(natural, top_up) + top_up,
    };

    let (pre_close_top_up, post_close_top_up) = match input.timing {
        PoolTiming::PreClose => (top_up, Decimal::ZERO),
        PoolTiming::PostClose => (Decimal::ZERO, top_up),
    };

    EsopOutput {
        current_pool_percent: current,
        target_pool_percent: target,
        timing: input.timing,
        naturally_diluted_percent: round_pct(natural),
        top_up_percent: top_up,
        pre_close_top_up,
        post_close_top_up,
        final_pool_percent: round_pct(final_pool),
        top_up_capped,
        target_already_met: false,
    }
}
