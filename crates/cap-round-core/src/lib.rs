pub mod engine;
pub mod error;
pub mod types;

#[cfg(feature = "scenario_set")]
pub mod scenarios;

#[cfg(feature = "validation")]
pub mod validation;

pub use error::CapRoundError;
pub use types::*;

/// Standard result type for all cap-round operations
pub type CapRoundResult<T> = Result<T, CapRoundError>;
