// Bid Validator
// Rejects structurally invalid bids before they reach the clearing engine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};
use validator::Validate;

use crate::models::BidSubmission;

/// Fields in the order their errors are reported
const FIELD_ORDER: [&str; 6] = [
    "id",
    "bidder_id",
    "bidder_email",
    "quantity",
    "max_price",
    "bid_time",
];

/// Result of validating a whole bid batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate every bid in the batch and collect all problems in one pass.
///
/// Never fails and never drops or reorders bids; whether an invalid batch
/// aborts clearing is the caller's decision. Bid ids must be unique within
/// the batch; every repeat after the first is reported.
pub fn validate_bids(bids: &[BidSubmission]) -> ValidationReport {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for (position, bid) in bids.iter().enumerate() {
        errors.extend(bid_errors(position, bid));

        if !bid.id.is_empty() && !seen_ids.insert(bid.id.as_str()) {
            errors.push(format!("Bid {}: duplicate id", bid.id));
        }
    }

    if errors.is_empty() {
        debug!("Validated {} bids, no errors", bids.len());
    } else {
        warn!(
            "Bid validation found {} error(s) across {} bids",
            errors.len(),
            bids.len()
        );
    }

    ValidationReport::from_errors(errors)
}

/// Messages for a single bid, one per failed constraint.
///
/// `position` is only used to label a bid whose id is itself missing.
pub fn bid_errors(position: usize, bid: &BidSubmission) -> Vec<String> {
    let failures = match bid.validate() {
        Ok(()) => return Vec::new(),
        Err(failures) => failures,
    };
    let field_errors = failures.field_errors();

    let label = if bid.id.is_empty() {
        format!("#{} (missing id)", position + 1)
    } else {
        bid.id.clone()
    };

    FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field).map(|errs| (*field, errs)))
        .flat_map(|(field, errs)| errs.iter().map(move |err| (field, err)))
        .map(|(field, err)| {
            let message = err
                .message
                .as_deref()
                .unwrap_or_else(|| err.code.as_ref());
            format!("Bid {}: {}{}", label, message, offending_value(field, bid))
        })
        .collect()
}

fn offending_value(field: &str, bid: &BidSubmission) -> String {
    match field {
        "quantity" => format!(" (got {})", bid.quantity),
        "max_price" => format!(" (got {})", bid.max_price),
        "bid_time" => format!(" (got {:?})", bid.bid_time),
        _ => String::new(),
    }
}
