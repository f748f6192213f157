//! Uniform clearing price engine
//!
//! Sealed-bid, quantity-aware Dutch auction over a fixed share supply:
//! bids are ranked by price then time, demand is accumulated until it covers
//! supply, and every winner pays the price of the marginal bid. Bids tied at
//! that price share what is left pro rata, floored to whole shares.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use tracing::{debug, trace};

use crate::error::{ClearingError, Result};
use crate::models::{
    Allocation, AllocationType, Bid, CalculationDetails, ClearingLogic, ClearingResult,
    ClearingStep, UndersubscribedPricing,
};

/// Stateless clearing engine. Cheap to clone, safe to share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearingEngine {
    undersubscribed_pricing: UndersubscribedPricing,
}

/// Where the demand walk stopped
struct DemandWalk {
    steps: Vec<ClearingStep>,
    total_demand: u64,
    /// Index into the sorted bids of the marginal bid, if supply was reached
    clearing_index: Option<usize>,
}

/// Pro-rata ratio kept as an exact fraction; the decimal form is for reporting
#[derive(Debug, Clone, Copy)]
struct ProRata {
    remaining: u64,
    marginal_quantity: u64,
    percentage: Decimal,
}

impl ProRata {
    /// `floor(quantity * remaining / marginal_quantity)` without rounding drift
    fn apply(&self, quantity: u64) -> u64 {
        let scaled = u128::from(quantity) * u128::from(self.remaining);
        let floored = scaled / u128::from(self.marginal_quantity);
        // remaining < marginal_quantity, so the result never exceeds quantity
        u64::try_from(floored).unwrap_or(quantity)
    }
}

impl ClearingEngine {
    pub fn new(undersubscribed_pricing: UndersubscribedPricing) -> Self {
        Self {
            undersubscribed_pricing,
        }
    }

    /// Determine the clearing price and allocate `total_supply` shares.
    ///
    /// Bids are assumed to be validated already. Returns
    /// [`ClearingError::InvalidSupply`] when `total_supply <= 0`.
    pub fn calculate(&self, bids: &[Bid], total_supply: i64) -> Result<ClearingResult> {
        let supply = match u64::try_from(total_supply) {
            Ok(supply) if supply > 0 => supply,
            _ => return Err(ClearingError::InvalidSupply(total_supply)),
        };

        if bids.is_empty() {
            debug!("No bids submitted, nothing to clear");
            return Ok(Self::empty_result(supply));
        }

        let ranked = rank_bids(bids);
        let walk = walk_demand(&ranked, supply);

        let (clearing_price, clearing_logic, pro_rata) = match walk.clearing_index {
            Some(index) => {
                let marginal = &walk.steps[index];
                let oversubscribed = marginal.running_demand_after > supply
                    && marginal.running_demand_before < supply;

                if oversubscribed {
                    let remaining = supply - marginal.running_demand_before;
                    let pro_rata = ProRata {
                        remaining,
                        marginal_quantity: marginal.quantity,
                        percentage: Decimal::from(remaining) / Decimal::from(marginal.quantity),
                    };
                    (
                        marginal.max_price,
                        ClearingLogic::ProRataAtClearingPrice,
                        Some(pro_rata),
                    )
                } else {
                    (marginal.max_price, ClearingLogic::FullAllocation, None)
                }
            }
            None => {
                let price = match self.undersubscribed_pricing {
                    UndersubscribedPricing::LowestBid => ranked
                        .last()
                        .map(|bid| bid.max_price)
                        .unwrap_or(Decimal::ZERO),
                    UndersubscribedPricing::ReservePrice(reserve) => reserve,
                };
                (price, ClearingLogic::Undersubscribed, None)
            }
        };

        debug!(
            "Clearing price {} ({}), demand considered {} of supply {}",
            clearing_price, clearing_logic, walk.total_demand, supply
        );

        let allocations = allocate(&ranked, supply, clearing_price, pro_rata)?;
        let shares_allocated: u64 = allocations.iter().map(|a| a.allocated_quantity).sum();

        Ok(ClearingResult {
            clearing_price,
            total_demand: walk.total_demand,
            shares_allocated,
            shares_remaining: supply - shares_allocated,
            pro_rata_applied: pro_rata.is_some(),
            allocations,
            calculation_details: CalculationDetails {
                clearing_bid_id: walk.clearing_index.map(|i| walk.steps[i].bid_id.clone()),
                steps: walk.steps,
                clearing_logic,
                pro_rata_percentage: pro_rata.map(|p| p.percentage),
            },
        })
    }

    fn empty_result(supply: u64) -> ClearingResult {
        ClearingResult {
            clearing_price: Decimal::ZERO,
            total_demand: 0,
            shares_allocated: 0,
            shares_remaining: supply,
            pro_rata_applied: false,
            allocations: Vec::new(),
            calculation_details: CalculationDetails {
                steps: Vec::new(),
                clearing_logic: ClearingLogic::Undersubscribed,
                pro_rata_percentage: None,
                clearing_bid_id: None,
            },
        }
    }
}

/// Clear with the default (lowest bid) undersubscribed pricing
pub fn calculate_clearing_price(bids: &[Bid], total_supply: i64) -> Result<ClearingResult> {
    ClearingEngine::default().calculate(bids, total_supply)
}

/// Allocation priority: price desc, then earlier submission, then bid id
pub fn priority_order(a: &Bid, b: &Bid) -> Ordering {
    b.max_price
        .cmp(&a.max_price)
        .then_with(|| a.bid_time.cmp(&b.bid_time))
        .then_with(|| a.id.cmp(&b.id))
}

fn rank_bids(bids: &[Bid]) -> Vec<&Bid> {
    let mut ranked: Vec<&Bid> = bids.iter().collect();
    ranked.sort_by(|a, b| priority_order(a, b));
    ranked
}

fn walk_demand(ranked: &[&Bid], supply: u64) -> DemandWalk {
    let mut steps = Vec::with_capacity(ranked.len());
    let mut running_demand: u64 = 0;

    for (index, bid) in ranked.iter().enumerate() {
        let before = running_demand;
        running_demand = running_demand.saturating_add(bid.quantity);
        let reached = running_demand >= supply;

        trace!(
            bid_id = %bid.id,
            price = %bid.max_price,
            before,
            after = running_demand,
            "demand step"
        );

        steps.push(ClearingStep {
            bid_id: bid.id.clone(),
            max_price: bid.max_price,
            quantity: bid.quantity,
            running_demand_before: before,
            running_demand_after: running_demand,
            is_clearing_price: reached,
        });

        if reached {
            return DemandWalk {
                steps,
                total_demand: running_demand,
                clearing_index: Some(index),
            };
        }
    }

    DemandWalk {
        steps,
        total_demand: running_demand,
        clearing_index: None,
    }
}

fn allocate(
    ranked: &[&Bid],
    supply: u64,
    clearing_price: Decimal,
    pro_rata: Option<ProRata>,
) -> Result<Vec<Allocation>> {
    let mut shares_allocated: u64 = 0;
    let mut allocations = Vec::with_capacity(ranked.len());

    for bid in ranked {
        let remaining = supply - shares_allocated;

        let (allocated, allocation_type, percentage) = match bid.max_price.cmp(&clearing_price) {
            Ordering::Greater => {
                let qty = bid.quantity.min(remaining);
                (qty, filled_or_rejected(qty, AllocationType::Full), None)
            }
            Ordering::Equal => match pro_rata {
                Some(ratio) => {
                    let qty = ratio.apply(bid.quantity).min(remaining);
                    let kind = filled_or_rejected(qty, AllocationType::ProRata);
                    let percentage = (kind == AllocationType::ProRata).then_some(ratio.percentage);
                    (qty, kind, percentage)
                }
                None => {
                    let qty = bid.quantity.min(remaining);
                    (qty, filled_or_rejected(qty, AllocationType::Full), None)
                }
            },
            Ordering::Less => (0, AllocationType::Rejected, None),
        };

        shares_allocated += allocated;

        let total_amount = Decimal::from(allocated)
            .checked_mul(clearing_price)
            .ok_or_else(|| {
                ClearingError::ArithmeticOverflow(format!(
                    "{} shares at {} for bid {}",
                    allocated, clearing_price, bid.id
                ))
            })?;

        allocations.push(Allocation {
            bid_id: bid.id.clone(),
            bidder_id: bid.bidder_id.clone(),
            bidder_email: bid.bidder_email.clone(),
            original_quantity: bid.quantity,
            allocated_quantity: allocated,
            clearing_price,
            total_amount,
            allocation_type,
            pro_rata_percentage: percentage,
        });
    }

    Ok(allocations)
}

fn filled_or_rejected(quantity: u64, kind: AllocationType) -> AllocationType {
    if quantity > 0 {
        kind
    } else {
        AllocationType::Rejected
    }
}
