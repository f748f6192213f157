pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{ClearingConfig, Config};
pub use error::{ClearingError, ErrorCode, Result};
pub use models::{
    Allocation, AllocationType, AuctionInput, Bid, BidSubmission, ClearingLogic, ClearingResult,
    UndersubscribedPricing,
};
pub use services::{
    calculate_clearing_price, validate_bids, AuctionClearingService, AuctionSummary,
    ClearingEngine, ClearingOutcome, ValidationReport,
};
