use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::SafeNote;
use crate::types::{percent_of, round_money, round_pct, Money, Percent, HUNDRED};

/// A SAFE may not convert into more than this share of the company.
pub const MAX_SAFE_OWNERSHIP_PCT: Decimal = dec!(95);

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Which term set the conversion price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionMethod {
    /// The valuation cap was at or below every alternative.
    Cap,
    /// The discounted pre-money was lower than the cap (or there was no cap).
    Discount,
    /// Cap-only note whose cap sits above the actual pre-money.
    PreMoney,
}

/// Why a note was left out of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    NoAmount,
    /// Neither a cap nor a discount: the amount alone sets no price.
    NoTerms,
    NegativeCap,
    NonPositivePrice,
    ExceedsOwnershipLimit,
}

// ─── Structs ─────────────────────────────────────────────────────────────────

/// One converted SAFE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeConversion {
    /// 1-based position in the input list.
    pub index: usize,
    pub note_id: String,
    pub amount: Money,
    pub valuation_cap: Money,
    pub discount_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_via_cap: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_via_discount: Option<Money>,
    pub conversion_price: Money,
    pub method: ConversionMethod,
    /// Ownership on conversion, before any post-close pool top-up.
    pub percent: Percent,
    /// Ownership on the final cap table.
    pub post_round_percent: Percent,
}

/// A note the converter filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSafe {
    pub index: usize,
    pub note_id: String,
    pub amount: Money,
    pub reason: SkipReason,
}

/// Output of the SAFE stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeConversionOutput {
    pub conversions: Vec<SafeConversion>,
    pub skipped: Vec<SkippedSafe>,
    pub total_safe_amount: Money,
    pub total_safe_percent: Percent,
}

// ─── Conversion ──────────────────────────────────────────────────────────────

enum Priced {
    Converted {
        price: Decimal,
        method: ConversionMethod,
        via_cap: Option<Decimal>,
        via_discount: Option<Decimal>,
    },
    Skipped(SkipReason),
}

fn price_note(note: &SafeNote, pre_money: Money) -> Priced {
    if note.amount <= Decimal::ZERO {
        return Priced::Skipped(SkipReason::NoAmount);
    }
    if note.valuation_cap < Decimal::ZERO {
        return Priced::Skipped(SkipReason::NegativeCap);
    }

    let via_cap = (note.valuation_cap > Decimal::ZERO).then_some(note.valuation_cap);
    let via_discount = (note.discount_percent > Decimal::ZERO)
        .then(|| pre_money * (Decimal::ONE - note.discount_percent / HUNDRED));

    let (price, method) = match (via_cap, via_discount) {
        (Some(cap), Some(disc)) => {
            if cap <= disc {
                (cap, ConversionMethod::Cap)
            } else {
                (disc, ConversionMethod::Discount)
            }
        }
        // A cap never converts above the real pre-money
        (Some(cap), None) => {
            if cap <= pre_money {
                (cap, ConversionMethod::Cap)
            } else {
                (pre_money, ConversionMethod::PreMoney)
            }
        }
        (None, Some(disc)) => (disc, ConversionMethod::Discount),
        (None, None) => return Priced::Skipped(SkipReason::NoTerms),
    };

    if price <= Decimal::ZERO {
        return Priced::Skipped(SkipReason::NonPositivePrice);
    }

    Priced::Converted {
        price,
        method,
        via_cap,
        via_discount,
    }
}

/// Convert every SAFE at the better-for-investor of cap and discount.
///
/// Degenerate notes are filtered, not errors: one bad note must not stop the
/// rest of the cap table being modelled. Each skip adds a warning.
pub fn convert_safes(
    notes: &[SafeNote],
    pre_money_valuation: Money,
    warnings: &mut Vec<String>,
) -> SafeConversionOutput {
    let mut conversions = Vec::new();
    let mut skipped = Vec::new();
    let mut total_amount = Decimal::ZERO;
    let mut total_percent = Decimal::ZERO;

    for (i, note) in notes.iter().enumerate() {
        let index = i + 1;
        let reason = match price_note(note, pre_money_valuation) {
            Priced::Converted {
                price,
                method,
                via_cap,
                via_discount,
            } => {
                // A price too small to divide by converts into far more than the limit
                match percent_of(note.amount, price) {
                    Some(percent) if percent <= MAX_SAFE_OWNERSHIP_PCT => {
                        let percent = round_pct(percent);
                        total_amount += note.amount;
                        total_percent += percent;
                        conversions.push(SafeConversion {
                            index,
                            note_id: note.id.clone(),
                            amount: note.amount,
                            valuation_cap: note.valuation_cap,
                            discount_percent: note.discount_percent,
                            price_via_cap: via_cap.map(round_money),
                            price_via_discount: via_discount.map(round_money),
                            conversion_price: round_money(price),
                            method,
                            percent,
                            post_round_percent: percent,
                        });
                        continue;
                    }
                    _ => SkipReason::ExceedsOwnershipLimit,
                }
            }
            Priced::Skipped(reason) => reason,
        };

        tracing::debug!(index, ?reason, "skipping SAFE note");
        if reason != SkipReason::NoAmount {
            warnings.push(format!(
                "SAFE #{index} excluded from conversion: {}",
                describe(reason)
            ));
        }
        skipped.push(SkippedSafe {
            index,
            note_id: note.id.clone(),
            amount: note.amount,
            reason,
        });
    }

    SafeConversionOutput {
        conversions,
        skipped,
        total_safe_amount: total_amount,
        total_safe_percent: total_percent,
    }
}

fn describe(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NoAmount => "no investment amount",
        SkipReason::NoTerms => "needs a valuation cap or a discount",
        SkipReason::NegativeCap => "valuation cap is negative",
        SkipReason::NonPositivePrice => "conversion price is not positive",
        SkipReason::ExceedsOwnershipLimit => "would convert into more than 95% of the company",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(notes: &[SafeNote], pre: Decimal) -> SafeConversionOutput {
        let mut warnings = Vec::new();
        convert_safes(notes, pre, &mut warnings)
    }

    #[test]
    fn test_cap_beats_discount() {
        // discount price = 10 * 0.8 = 8, cap = 7 -> cap wins
        let out = convert(&[SafeNote::new(dec!(0.5), dec!(7), dec!(20))], dec!(10));
        let c = &out.conversions[0];
        assert_eq!(c.conversion_price, dec!(7));
        assert_eq!(c.method, ConversionMethod::Cap);
        assert_eq!(c.price_via_discount, Some(dec!(8)));
        assert_eq!(c.percent, round_pct(dec!(0.5) / dec!(7) * dec!(100)));
    }

    #[test]
    fn test_discount_beats_cap() {
        let out = convert(&[SafeNote::new(dec!(0.5), dec!(9), dec!(20))], dec!(10));
        let c = &out.conversions[0];
        assert_eq!(c.conversion_price, dec!(8));
        assert_eq!(c.method, ConversionMethod::Discount);
        assert_eq!(c.percent, dec!(6.25));
    }

    #[test]
    fn test_cap_only_never_above_pre_money() {
        let out = convert(&[SafeNote::new(dec!(1), dec!(20), Decimal::ZERO)], dec!(10));
        let c = &out.conversions[0];
        assert_eq!(c.conversion_price, dec!(10));
        assert_eq!(c.method, ConversionMethod::PreMoney);
        assert_eq!(c.percent, dec!(10));
    }

    #[test]
    fn test_cap_only_below_pre_money() {
        let out = convert(&[SafeNote::new(dec!(1), dec!(5), Decimal::ZERO)], dec!(10));
        assert_eq!(out.conversions[0].conversion_price, dec!(5));
        assert_eq!(out.conversions[0].percent, dec!(20));
    }

    #[test]
    fn test_discount_only() {
        let out = convert(&[SafeNote::new(dec!(1), Decimal::ZERO, dec!(50))], dec!(10));
        assert_eq!(out.conversions[0].conversion_price, dec!(5));
        assert_eq!(out.conversions[0].percent, dec!(20));
    }

    #[test]
    fn test_no_terms_is_skipped() {
        let mut warnings = Vec::new();
        let out = convert_safes(
            &[SafeNote::new(dec!(1), Decimal::ZERO, Decimal::ZERO)],
            dec!(10),
            &mut warnings,
        );
        assert!(out.conversions.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::NoTerms);
        assert_eq!(out.total_safe_percent, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_full_discount_is_degenerate() {
        let out = convert(&[SafeNote::new(dec!(1), Decimal::ZERO, dec!(100))], dec!(10));
        assert!(out.conversions.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::NonPositivePrice);
    }

    #[test]
    fn test_absurd_ownership_rejected() {
        // cap at 1% of pre-money: 1 / 0.1 = 1000%
        let out = convert(&[SafeNote::new(dec!(1), dec!(0.1), Decimal::ZERO)], dec!(10));
        assert!(out.conversions.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::ExceedsOwnershipLimit);
    }

    #[test]
    fn test_vanishing_cap_rejected_without_overflow() {
        let tiny_cap = dec!(0.0000000000000000000000000001);
        let mut warnings = Vec::new();
        let out = convert_safes(
            &[
                SafeNote::new(dec!(1), tiny_cap, Decimal::ZERO),
                SafeNote::new(dec!(0.5), dec!(5), Decimal::ZERO),
            ],
            dec!(10),
            &mut warnings,
        );
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].reason, SkipReason::ExceedsOwnershipLimit);
        assert_eq!(out.conversions.len(), 1);
        assert_eq!(out.total_safe_percent, dec!(10));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_zero_amount_skipped_without_warning() {
        let mut warnings = Vec::new();
        let out = convert_safes(
            &[SafeNote::new(Decimal::ZERO, dec!(5), Decimal::ZERO)],
            dec!(10),
            &mut warnings,
        );
        assert_eq!(out.skipped[0].reason, SkipReason::NoAmount);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_index_is_input_position_after_filtering() {
        let notes = vec![
            SafeNote::new(dec!(1), Decimal::ZERO, Decimal::ZERO),
            SafeNote::new(dec!(0.5), dec!(5), Decimal::ZERO),
            SafeNote::new(dec!(0.25), Decimal::ZERO, dec!(20)),
        ];
        let out = convert(&notes, dec!(10));
        let indices: Vec<usize> = out.conversions.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 3]);
        assert_eq!(out.skipped[0].index, 1);
        assert_eq!(out.total_safe_amount, dec!(0.75));
        // 0.5/5 = 10%, 0.25/8 = 3.125%
        assert_eq!(out.total_safe_percent, dec!(13.125));
    }
}
