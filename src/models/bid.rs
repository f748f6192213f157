use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::error::{ClearingError, Result};
use crate::services::validation::bid_errors;
use crate::utils::parse_bid_time;

/// Bid as received from the surrounding system, before validation.
///
/// Missing strings default to empty and numbers keep their sign; malformed
/// values are reported by the validator rather than by deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BidSubmission {
    #[serde(default)]
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "bidder_id must not be empty"))]
    pub bidder_id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "bidder_email must not be empty"))]
    pub bidder_email: String,

    #[serde(default)]
    #[validate(range(min = 1, message = "quantity must be greater than 0"))]
    pub quantity: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_positive_price"))]
    pub max_price: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_bid_time"))]
    pub bid_time: String,
}

fn validate_positive_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("max_price_not_positive")
            .with_message(Cow::Borrowed("max_price must be greater than 0")))
    }
}

fn validate_bid_time(raw: &str) -> std::result::Result<(), ValidationError> {
    match parse_bid_time(raw) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("bid_time_invalid")
            .with_message(Cow::Borrowed("bid_time is not a valid timestamp"))),
    }
}

/// A validated, immutable bid. The clearing engine only ever sees these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: String,
    pub bidder_id: String,
    /// Used for labelling output only, never for ordering
    pub bidder_email: String,
    pub quantity: u64,
    /// Ceiling unit price; winners pay the clearing price
    pub max_price: Decimal,
    /// Tie-break key at equal price, earlier wins
    pub bid_time: DateTime<Utc>,
}

impl Bid {
    pub fn new(
        id: impl Into<String>,
        bidder_id: impl Into<String>,
        bidder_email: impl Into<String>,
        quantity: u64,
        max_price: Decimal,
        bid_time: DateTime<Utc>,
    ) -> Result<Self> {
        let bid = Self {
            id: id.into(),
            bidder_id: bidder_id.into(),
            bidder_email: bidder_email.into(),
            quantity,
            max_price,
            bid_time,
        };

        let errors = bid_errors(0, &BidSubmission::from(&bid));
        if errors.is_empty() {
            Ok(bid)
        } else {
            Err(ClearingError::invalid_bids(errors))
        }
    }
}

impl From<&Bid> for BidSubmission {
    fn from(bid: &Bid) -> Self {
        Self {
            id: bid.id.clone(),
            bidder_id: bid.bidder_id.clone(),
            bidder_email: bid.bidder_email.clone(),
            quantity: i64::try_from(bid.quantity).unwrap_or(i64::MAX),
            max_price: bid.max_price,
            bid_time: bid.bid_time.to_rfc3339(),
        }
    }
}

impl TryFrom<BidSubmission> for Bid {
    type Error = ClearingError;

    fn try_from(submission: BidSubmission) -> Result<Self> {
        let errors = bid_errors(0, &submission);
        if !errors.is_empty() {
            return Err(ClearingError::invalid_bids(errors));
        }

        let quantity = u64::try_from(submission.quantity).map_err(|_| {
            ClearingError::invalid_bids(vec![format!(
                "Bid {}: quantity must be greater than 0",
                submission.id
            )])
        })?;
        let bid_time = parse_bid_time(&submission.bid_time).ok_or_else(|| {
            ClearingError::invalid_bids(vec![format!(
                "Bid {}: bid_time is not a valid timestamp",
                submission.id
            )])
        })?;

        Ok(Self {
            id: submission.id,
            bidder_id: submission.bidder_id,
            bidder_email: submission.bidder_email,
            quantity,
            max_price: submission.max_price,
            bid_time,
        })
    }
}
