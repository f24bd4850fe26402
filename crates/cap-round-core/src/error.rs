use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapRoundError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Cap table is over-subscribed: pre-round ownership totals {total}% (must not exceed 100%)")]
    OverSubscribed { total: Decimal },

    #[error(
        "Pro-rata allocations total ${attempted}M but only ${available}M of the round is \
         available outside the lead investor. Reduce pro-rata amounts or increase the other allocation."
    )]
    ProRataExceedsAvailable { attempted: Decimal, available: Decimal },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CapRoundError {
    /// Whether the caller can fix this by adjusting a specific input and
    /// should be shown the message, as opposed to a generic "cannot calculate".
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CapRoundError::ProRataExceedsAvailable { .. })
    }
}

impl From<serde_json::Error> for CapRoundError {
    fn from(e: serde_json::Error) -> Self {
        CapRoundError::Serialization(e.to_string())
    }
}
