use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AllocationType, ClearingLogic, ClearingResult};

/// Row shape for the auction's clearing result.
///
/// The store is expected to keep one row per `auction_id`; nothing here
/// enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearingRecord {
    pub auction_id: Uuid,
    pub clearing_price: Decimal,
    pub clearing_logic: ClearingLogic,
    pub total_supply: u64,
    pub total_demand: u64,
    pub shares_allocated: u64,
    pub shares_remaining: u64,
    pub pro_rata_applied: bool,
    pub bid_count: usize,
    /// Demand walk and decision, stored as a JSON column
    pub calculation_details: serde_json::Value,
}

/// One row per bid outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub auction_id: Uuid,
    pub bid_id: String,
    pub bidder_id: String,
    pub bidder_email: String,
    pub original_quantity: u64,
    pub allocated_quantity: u64,
    pub clearing_price: Decimal,
    pub total_amount: Decimal,
    pub allocation_type: AllocationType,
    pub pro_rata_percentage: Option<Decimal>,
}

impl ClearingResult {
    /// Split the result into rows keyed by `auction_id`
    pub fn to_records(&self, auction_id: Uuid) -> (ClearingRecord, Vec<AllocationRecord>) {
        // Plain structs with string-keyed fields; serialization cannot fail
        let calculation_details =
            serde_json::to_value(&self.calculation_details).unwrap_or(serde_json::Value::Null);

        let clearing = ClearingRecord {
            auction_id,
            clearing_price: self.clearing_price,
            clearing_logic: self.clearing_logic(),
            total_supply: self.total_supply(),
            total_demand: self.total_demand,
            shares_allocated: self.shares_allocated,
            shares_remaining: self.shares_remaining,
            pro_rata_applied: self.pro_rata_applied,
            bid_count: self.allocations.len(),
            calculation_details,
        };

        let allocations = self
            .allocations
            .iter()
            .map(|a| AllocationRecord {
                auction_id,
                bid_id: a.bid_id.clone(),
                bidder_id: a.bidder_id.clone(),
                bidder_email: a.bidder_email.clone(),
                original_quantity: a.original_quantity,
                allocated_quantity: a.allocated_quantity,
                clearing_price: a.clearing_price,
                total_amount: a.total_amount,
                allocation_type: a.allocation_type,
                pro_rata_percentage: a.pro_rata_percentage,
            })
            .collect();

        (clearing, allocations)
    }
}
