pub mod engine;
pub mod records;
pub mod summary;

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ClearingConfig;
use crate::error::{ClearingError, Result};
use crate::metrics::{
    track_bid_validation, track_clearing_failure, track_clearing_run, track_shares_allocated,
};
use crate::models::{Bid, BidSubmission, ClearingResult};
use crate::services::validation::validate_bids;

pub use engine::{calculate_clearing_price, priority_order, ClearingEngine};
pub use records::{AllocationRecord, ClearingRecord};
pub use summary::AuctionSummary;

/// Everything produced by clearing one auction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingOutcome {
    pub auction_id: Uuid,
    pub result: ClearingResult,
    pub summary: AuctionSummary,
}

/// Validates, converts and clears a bid batch in one call
#[derive(Debug, Clone, Default)]
pub struct AuctionClearingService {
    engine: ClearingEngine,
    config: ClearingConfig,
}

impl AuctionClearingService {
    pub fn new(config: ClearingConfig) -> Self {
        Self {
            engine: ClearingEngine::new(config.undersubscribed_pricing),
            config,
        }
    }

    pub fn config(&self) -> &ClearingConfig {
        &self.config
    }

    /// Clear an auction from raw submissions.
    ///
    /// Any invalid bid aborts the whole batch with
    /// [`ClearingError::InvalidBids`]; nothing is partially cleared.
    pub fn clear_auction(
        &self,
        auction_id: Uuid,
        submissions: &[BidSubmission],
        total_supply: i64,
    ) -> Result<ClearingOutcome> {
        info!(
            "Clearing auction {} with {} bids for {} shares",
            auction_id,
            submissions.len(),
            total_supply
        );
        let start = Instant::now();

        let outcome = self.run(auction_id, submissions, total_supply);

        match &outcome {
            Ok(outcome) => {
                let logic = outcome.result.clearing_logic();
                track_clearing_run(logic, start.elapsed().as_secs_f64() * 1000.0);
                track_shares_allocated(logic, outcome.result.shares_allocated);
                info!(
                    "Auction {} cleared at {} ({}): {} allocated, {} remaining",
                    auction_id,
                    outcome.result.clearing_price,
                    logic,
                    outcome.result.shares_allocated,
                    outcome.result.shares_remaining
                );
            }
            Err(e) => {
                track_clearing_failure(e.error_code().code());
                error!("Failed to clear auction {}: {}", auction_id, e);
            }
        }

        outcome
    }

    fn run(
        &self,
        auction_id: Uuid,
        submissions: &[BidSubmission],
        total_supply: i64,
    ) -> Result<ClearingOutcome> {
        if total_supply <= 0 {
            return Err(ClearingError::InvalidSupply(total_supply));
        }

        let report = validate_bids(submissions);
        track_bid_validation(submissions.len(), report.errors.len());
        if !report.is_valid {
            warn!(
                "Auction {} rejected: {} invalid bid field(s)",
                auction_id,
                report.errors.len()
            );
            return Err(ClearingError::invalid_bids(report.errors));
        }

        let bids = submissions
            .iter()
            .cloned()
            .map(Bid::try_from)
            .collect::<Result<Vec<_>>>()?;

        let result = self.engine.calculate(&bids, total_supply)?;
        let summary = AuctionSummary::with_precision(&result, self.config.ratio_precision);

        Ok(ClearingOutcome {
            auction_id,
            result,
            summary,
        })
    }
}
