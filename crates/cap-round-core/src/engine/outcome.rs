use serde::{Deserialize, Serialize};

use crate::error::CapRoundError;
use crate::types::Money;
use crate::CapRoundResult;

/// Tagged error record for conditions the user can fix by editing inputs.
/// Distinguished from a result by the `error` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: bool,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_amount: Option<Money>,
}

impl ErrorResult {
    /// Build the record for a recoverable error; `None` for everything else.
    pub fn from_error(err: &CapRoundError) -> Option<Self> {
        match err {
            CapRoundError::ProRataExceedsAvailable {
                attempted,
                available,
            } => Some(ErrorResult {
                error: true,
                error_message: err.to_string(),
                attempted_amount: Some(*attempted),
                available_amount: Some(*available),
            }),
            _ => None,
        }
    }
}

/// What a caller renders: a result, or an error message with numbers in it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response<T: Serialize> {
    Success(T),
    Error(ErrorResult),
}

/// Map an engine result onto the result / error record / nothing contract.
///
/// `None` means "cannot calculate, check inputs"; the reason is logged.
pub fn respond<T: Serialize>(result: CapRoundResult<T>) -> Option<Response<T>> {
    match result {
        Ok(value) => Some(Response::Success(value)),
        Err(err) => match ErrorResult::from_error(&err) {
            Some(record) => Some(Response::Error(record)),
            None => {
                tracing::warn!(error = %err, "scenario could not be calculated");
                None
            }
        },
    }
}

/// Serialize a response the way JavaScript callers expect: `null` when absent.
pub fn respond_json<T: Serialize>(result: CapRoundResult<T>) -> CapRoundResult<String> {
    Ok(serde_json::to_string(&respond(result))?)
}
