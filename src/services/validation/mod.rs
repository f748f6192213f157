pub mod bid_validator;

pub use bid_validator::{bid_errors, validate_bids, ValidationReport};
