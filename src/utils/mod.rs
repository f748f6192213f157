// Utility functions
// Timestamp parsing and tracing setup

pub mod logging;
pub mod time;

pub use logging::init_tracing;
pub use time::parse_bid_time;
