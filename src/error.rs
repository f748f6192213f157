use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClearingError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation errors (3xxx)
    #[serde(rename = "VAL_3003")]
    InvalidFormat,

    // Business logic errors (5xxx)
    #[serde(rename = "BIZ_5007")]
    InvalidSupply,
    #[serde(rename = "BIZ_5008")]
    InvalidBidBatch,

    // Internal errors (9xxx)
    #[serde(rename = "INT_9996")]
    ArithmeticOverflow,
    #[serde(rename = "INT_9997")]
    UnexpectedError,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidFormat => 3003,

            ErrorCode::InvalidSupply => 5007,
            ErrorCode::InvalidBidBatch => 5008,

            ErrorCode::ArithmeticOverflow => 9996,
            ErrorCode::UnexpectedError => 9997,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFormat => "Invalid format provided",

            ErrorCode::InvalidSupply => "Total share supply must be greater than zero",
            ErrorCode::InvalidBidBatch => {
                "One or more bids are invalid; the auction was not cleared"
            }

            ErrorCode::ArithmeticOverflow => "Amount exceeds the representable range",
            ErrorCode::UnexpectedError => "An unexpected error occurred",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClearingError {
    /// Caller bug: the engine was invoked with a non-positive share supply.
    #[error("Invalid total supply: {0} (must be greater than 0)")]
    InvalidSupply(i64),

    /// The bid batch failed validation. Carries every collected message.
    #[error("Bid validation failed with {} error(s): {}", errors.len(), errors.join("; "))]
    InvalidBids { errors: Vec<String> },

    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClearingError {
    /// Build an `InvalidBids` error from collected validation messages
    pub fn invalid_bids(errors: Vec<String>) -> Self {
        ClearingError::InvalidBids { errors }
    }

    /// Get error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ClearingError::InvalidSupply(_) => ErrorCode::InvalidSupply,
            ClearingError::InvalidBids { .. } => ErrorCode::InvalidBidBatch,
            ClearingError::ArithmeticOverflow(_) => ErrorCode::ArithmeticOverflow,
            ClearingError::Serialization(_) => ErrorCode::InvalidFormat,
            ClearingError::Io(_) => ErrorCode::UnexpectedError,
        }
    }

    /// Validation messages, if this error came from the bid validator
    pub fn validation_errors(&self) -> &[String] {
        match self {
            ClearingError::InvalidBids { errors } => errors,
            _ => &[],
        }
    }
}
