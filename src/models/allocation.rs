use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a bid was treated by the clearing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationType {
    Full,
    ProRata,
    Rejected,
}

impl fmt::Display for AllocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::ProRata => write!(f, "pro_rata"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Outcome for one bid. Exactly one per input bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub bid_id: String,
    pub bidder_id: String,
    pub bidder_email: String,
    pub original_quantity: u64,
    pub allocated_quantity: u64,
    pub clearing_price: Decimal,
    /// `allocated_quantity * clearing_price`, exact
    pub total_amount: Decimal,
    pub allocation_type: AllocationType,
    /// Only present for `ProRata` allocations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_rata_percentage: Option<Decimal>,
}

impl Allocation {
    pub fn is_successful(&self) -> bool {
        self.allocated_quantity > 0
    }

    /// Shares requested but not granted
    pub fn unfilled_quantity(&self) -> u64 {
        self.original_quantity.saturating_sub(self.allocated_quantity)
    }
}
