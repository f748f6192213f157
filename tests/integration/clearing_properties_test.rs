use auction_clearing::{calculate_clearing_price, AllocationType, Bid, ClearingLogic};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Narrow price and time ranges so ties at the clearing price are common
fn bids_strategy() -> impl Strategy<Value = Vec<Bid>> {
    prop::collection::vec((1u64..=500, 1i64..=12, 0i64..=4), 0..25).prop_map(|shapes| {
        let t0 = Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap();
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, (quantity, price_quarters, minute))| Bid {
                id: format!("bid-{:03}", i),
                bidder_id: format!("bidder-{}", i % 7),
                bidder_email: format!("bidder{}@example.com", i % 7),
                quantity,
                // quarter-dollar steps exercise fractional prices
                max_price: Decimal::new(price_quarters * 25, 2),
                bid_time: t0 + Duration::minutes(minute),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_supply_is_conserved(bids in bids_strategy(), supply in 1i64..5_000) {
        let result = calculate_clearing_price(&bids, supply).unwrap();

        prop_assert_eq!(result.shares_allocated + result.shares_remaining, supply as u64);
        prop_assert_eq!(
            result.allocations.iter().map(|a| a.allocated_quantity).sum::<u64>(),
            result.shares_allocated
        );
    }

    #[test]
    fn prop_allocation_never_exceeds_request(bids in bids_strategy(), supply in 1i64..5_000) {
        let result = calculate_clearing_price(&bids, supply).unwrap();

        for allocation in &result.allocations {
            prop_assert!(allocation.allocated_quantity <= allocation.original_quantity);
        }
    }

    #[test]
    fn prop_uniform_price_and_exact_amounts(bids in bids_strategy(), supply in 1i64..5_000) {
        let result = calculate_clearing_price(&bids, supply).unwrap();

        for allocation in &result.allocations {
            prop_assert_eq!(allocation.clearing_price, result.clearing_price);
            prop_assert_eq!(
                allocation.total_amount,
                Decimal::from(allocation.allocated_quantity) * result.clearing_price
            );
        }
    }

    #[test]
    fn prop_bids_above_price_are_filled(bids in bids_strategy(), supply in 1i64..5_000) {
        let result = calculate_clearing_price(&bids, supply).unwrap();

        for allocation in &result.allocations {
            let bid = bids.iter().find(|b| b.id == allocation.bid_id).unwrap();
            if bid.max_price > result.clearing_price {
                prop_assert_eq!(allocation.allocated_quantity, allocation.original_quantity);
                prop_assert_eq!(allocation.allocation_type, AllocationType::Full);
            }
        }
    }

    #[test]
    fn prop_bids_below_price_get_nothing(bids in bids_strategy(), supply in 1i64..5_000) {
        let result = calculate_clearing_price(&bids, supply).unwrap();

        for allocation in &result.allocations {
            let bid = bids.iter().find(|b| b.id == allocation.bid_id).unwrap();
            if bid.max_price < result.clearing_price {
                prop_assert_eq!(allocation.allocated_quantity, 0);
                prop_assert_eq!(allocation.allocation_type, AllocationType::Rejected);
            }
        }
    }

    #[test]
    fn prop_idempotent(bids in bids_strategy(), supply in 1i64..5_000) {
        let first = calculate_clearing_price(&bids, supply).unwrap();
        let second = calculate_clearing_price(&bids, supply).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_input_order_is_irrelevant(
        (bids, shuffled) in bids_strategy().prop_flat_map(|bids| {
            (Just(bids.clone()), Just(bids).prop_shuffle())
        }),
        supply in 1i64..5_000,
    ) {
        let original = calculate_clearing_price(&bids, supply).unwrap();
        let permuted = calculate_clearing_price(&shuffled, supply).unwrap();

        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn prop_pro_rata_only_at_oversubscribed_margin(bids in bids_strategy(), supply in 1i64..5_000) {
        let result = calculate_clearing_price(&bids, supply).unwrap();
        let any_pro_rata = result
            .allocations
            .iter()
            .any(|a| a.allocation_type == AllocationType::ProRata);

        if any_pro_rata {
            prop_assert!(result.pro_rata_applied);
            prop_assert_eq!(result.clearing_logic(), ClearingLogic::ProRataAtClearingPrice);
        }
        if result.clearing_logic() == ClearingLogic::Undersubscribed {
            prop_assert!(result.total_demand < supply as u64);
            prop_assert_eq!(result.shares_allocated, result.total_demand);
        }
    }
}
