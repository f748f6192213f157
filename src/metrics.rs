use ::metrics::{counter, histogram};

use crate::models::ClearingLogic;

/// Track a completed clearing run
pub fn track_clearing_run(logic: ClearingLogic, duration_ms: f64) {
    counter!(
        "auction_clearing_runs_total",
        "logic" => logic.to_string(),
        "success" => "true"
    )
    .increment(1);

    histogram!("auction_clearing_duration_ms", "logic" => logic.to_string()).record(duration_ms);
}

/// Track a clearing run that ended in an error
pub fn track_clearing_failure(error_code: u16) {
    counter!(
        "auction_clearing_runs_total",
        "success" => "false",
        "error_code" => error_code.to_string()
    )
    .increment(1);
}

/// Track a validated bid batch
pub fn track_bid_validation(bid_count: usize, error_count: usize) {
    counter!("auction_bids_validated_total").increment(bid_count as u64);

    if error_count > 0 {
        counter!("auction_bid_validation_failures_total").increment(error_count as u64);
    }
}

/// Track shares handed out in a run
pub fn track_shares_allocated(logic: ClearingLogic, shares: u64) {
    histogram!("auction_shares_allocated", "logic" => logic.to_string()).record(shares as f64);
}
