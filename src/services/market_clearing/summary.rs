use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AllocationType, ClearingLogic, ClearingResult};

pub const DEFAULT_RATIO_PRECISION: u32 = 4;

/// Aggregate view of a clearing run for reports and notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub clearing_price: Decimal,
    pub clearing_logic: ClearingLogic,
    pub total_supply: u64,
    pub total_demand: u64,
    pub shares_allocated: u64,
    pub shares_remaining: u64,
    pub total_bids: usize,
    pub successful_bids: usize,
    pub rejected_bids: usize,
    pub full_allocations: usize,
    pub pro_rata_allocations: usize,
    pub total_revenue: Decimal,
    /// total_demand / total_supply
    pub demand_ratio: Decimal,
    /// shares_allocated / total_supply
    pub allocation_ratio: Decimal,
}

impl AuctionSummary {
    pub fn from_result(result: &ClearingResult) -> Self {
        Self::with_precision(result, DEFAULT_RATIO_PRECISION)
    }

    /// Build a summary rounding ratios to `ratio_precision` decimal places
    pub fn with_precision(result: &ClearingResult, ratio_precision: u32) -> Self {
        let total_supply = result.total_supply();

        let mut full_allocations = 0;
        let mut pro_rata_allocations = 0;
        for allocation in &result.allocations {
            match allocation.allocation_type {
                AllocationType::Full => full_allocations += 1,
                AllocationType::ProRata => pro_rata_allocations += 1,
                AllocationType::Rejected => {}
            }
        }

        let total_revenue = result
            .successful_allocations()
            .map(|a| a.total_amount)
            .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount));

        Self {
            clearing_price: result.clearing_price,
            clearing_logic: result.clearing_logic(),
            total_supply,
            total_demand: result.total_demand,
            shares_allocated: result.shares_allocated,
            shares_remaining: result.shares_remaining,
            total_bids: result.allocations.len(),
            successful_bids: result.successful_allocations().count(),
            rejected_bids: result.rejected_allocations().count(),
            full_allocations,
            pro_rata_allocations,
            total_revenue,
            demand_ratio: ratio(result.total_demand, total_supply, ratio_precision),
            allocation_ratio: ratio(result.shares_allocated, total_supply, ratio_precision),
        }
    }

    pub fn is_oversubscribed(&self) -> bool {
        self.total_demand > self.total_supply
    }
}

fn ratio(numerator: u64, denominator: u64, precision: u32) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .map(|r| r.round_dp(precision))
        .unwrap_or(Decimal::ZERO)
}

impl fmt::Display for AuctionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Auction clearing summary")?;
        writeln!(
            f,
            "  Clearing price:    {} ({})",
            self.clearing_price, self.clearing_logic
        )?;
        writeln!(f, "  Total supply:      {}", self.total_supply)?;
        writeln!(
            f,
            "  Total demand:      {} ({}x supply)",
            self.total_demand, self.demand_ratio
        )?;
        writeln!(
            f,
            "  Shares allocated:  {} ({}x supply)",
            self.shares_allocated, self.allocation_ratio
        )?;
        writeln!(f, "  Shares remaining:  {}", self.shares_remaining)?;
        writeln!(
            f,
            "  Bids:              {} total, {} successful ({} full, {} pro rata), {} rejected",
            self.total_bids,
            self.successful_bids,
            self.full_allocations,
            self.pro_rata_allocations,
            self.rejected_bids
        )?;
        write!(f, "  Total revenue:     {}", self.total_revenue)
    }
}
