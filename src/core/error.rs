//! Conversion error taxonomy

use crate::core::currency::Currency;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    /// Transport failure, non-success status or an undecodable body.
    #[error("Request failed for {pair}: {reason}")]
    RequestFailed { pair: String, reason: String },

    /// The service answered without a rate for the requested currency.
    #[error("No rate returned for currency: {0}")]
    NotFound(Currency),

    /// Newer input replaced the request before it resolved. Never shown to the user.
    #[error("Request #{generation} was superseded by newer input")]
    Superseded { generation: u64 },
}

impl ConversionError {
    pub fn request_failed(pair: impl Into<String>, reason: impl ToString) -> Self {
        ConversionError::RequestFailed {
            pair: pair.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, ConversionError::Superseded { .. })
    }
}
