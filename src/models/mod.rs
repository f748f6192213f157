// Data models
// Bid input records, clearing output, auction input files

pub mod allocation;
pub mod auction;
pub mod bid;
pub mod clearing;

pub use allocation::{Allocation, AllocationType};
pub use auction::AuctionInput;
pub use bid::{Bid, BidSubmission};
pub use clearing::{
    CalculationDetails, ClearingLogic, ClearingResult, ClearingStep, UndersubscribedPricing,
};
