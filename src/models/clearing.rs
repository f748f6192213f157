use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::allocation::Allocation;

/// Clearing price policy when total demand never reaches supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndersubscribedPricing {
    /// Clear at the lowest submitted bid price
    #[default]
    LowestBid,
    /// Clear at a fixed reserve price; bids below it are rejected.
    ///
    /// Only consulted when demand never reaches supply. It is not a general
    /// price floor: a covered auction still clears at its marginal bid, even
    /// below the reserve.
    ReservePrice(Decimal),
}

/// Which branch of the clearing algorithm decided the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearingLogic {
    FullAllocation,
    ProRataAtClearingPrice,
    Undersubscribed,
}

impl fmt::Display for ClearingLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullAllocation => write!(f, "full_allocation"),
            Self::ProRataAtClearingPrice => write!(f, "pro_rata_at_clearing_price"),
            Self::Undersubscribed => write!(f, "undersubscribed"),
        }
    }
}

/// Snapshot of the demand walk after adding one bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingStep {
    pub bid_id: String,
    pub max_price: Decimal,
    pub quantity: u64,
    pub running_demand_before: u64,
    pub running_demand_after: u64,
    pub is_clearing_price: bool,
}

/// Audit trail of a clearing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationDetails {
    pub steps: Vec<ClearingStep>,
    pub clearing_logic: ClearingLogic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_rata_percentage: Option<Decimal>,
    /// Marginal bid that set the price; absent when undersubscribed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearing_bid_id: Option<String>,
}

/// Complete output of one clearing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingResult {
    pub clearing_price: Decimal,
    /// Demand accumulated while locating the clearing price, not the sum of all bids
    pub total_demand: u64,
    pub shares_allocated: u64,
    pub shares_remaining: u64,
    pub pro_rata_applied: bool,
    /// Priority order (price desc, time asc, id asc)
    pub allocations: Vec<Allocation>,
    pub calculation_details: CalculationDetails,
}

impl ClearingResult {
    /// Supply the run was computed against
    pub fn total_supply(&self) -> u64 {
        self.shares_allocated + self.shares_remaining
    }

    pub fn clearing_logic(&self) -> ClearingLogic {
        self.calculation_details.clearing_logic
    }

    /// Allocations that received at least one share
    pub fn successful_allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations.iter().filter(|a| a.is_successful())
    }

    /// Allocations that received nothing
    pub fn rejected_allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations.iter().filter(|a| !a.is_successful())
    }

    pub fn allocation_for(&self, bid_id: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.bid_id == bid_id)
    }
}
