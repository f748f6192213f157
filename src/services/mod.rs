// Auction services
// Bid validation and uniform price clearing

pub mod market_clearing;
pub mod validation;

pub use market_clearing::{
    calculate_clearing_price, AllocationRecord, AuctionClearingService, AuctionSummary,
    ClearingEngine, ClearingOutcome, ClearingRecord,
};
pub use validation::{validate_bids, ValidationReport};
