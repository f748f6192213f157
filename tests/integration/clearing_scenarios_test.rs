use anyhow::Result;
use auction_clearing::{
    calculate_clearing_price, AllocationType, AuctionSummary, Bid, ClearingLogic,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 13, 30, 0).unwrap()
}

fn bid(id: &str, quantity: u64, price: &str, seconds: i64) -> Bid {
    Bid::new(
        id,
        &format!("investor-{}", id),
        &format!("{}@investors.test", id.to_lowercase()),
        quantity,
        Decimal::from_str(price).unwrap(),
        opening_time() + Duration::seconds(seconds),
    )
    .unwrap()
}

fn reference_bids() -> Vec<Bid> {
    vec![
        bid("A", 500, "120", 0),
        bid("B", 200, "140", 10),
        bid("C", 300, "100", 20),
        bid("D", 400, "130", 30),
    ]
}

#[test]
fn test_reference_auction_clears_at_marginal_price() -> Result<()> {
    let result = calculate_clearing_price(&reference_bids(), 1000)?;

    assert_eq!(result.clearing_price, Decimal::from(120));
    assert_eq!(result.clearing_logic(), ClearingLogic::ProRataAtClearingPrice);
    assert_eq!(
        result.calculation_details.pro_rata_percentage,
        Some(Decimal::from_str("0.8")?)
    );

    let expected = [
        ("B", 200, AllocationType::Full, 24_000),
        ("D", 400, AllocationType::Full, 48_000),
        ("A", 400, AllocationType::ProRata, 48_000),
        ("C", 0, AllocationType::Rejected, 0),
    ];
    for (allocation, (id, qty, kind, amount)) in result.allocations.iter().zip(expected) {
        assert_eq!(allocation.bid_id, id);
        assert_eq!(allocation.allocated_quantity, qty);
        assert_eq!(allocation.allocation_type, kind);
        assert_eq!(allocation.total_amount, Decimal::from(amount));
        assert_eq!(allocation.clearing_price, Decimal::from(120));
    }

    assert_eq!(result.shares_allocated, 1000);
    assert_eq!(result.shares_remaining, 0);

    let summary = AuctionSummary::from_result(&result);
    assert_eq!(summary.total_revenue, Decimal::from(120_000));
    Ok(())
}

#[test]
fn test_single_bid_exactly_filling_supply() -> Result<()> {
    let result = calculate_clearing_price(&[bid("solo", 100, "50", 0)], 100)?;

    assert_eq!(result.clearing_price, Decimal::from(50));
    assert!(!result.pro_rata_applied);
    assert_eq!(result.shares_remaining, 0);
    assert_eq!(result.allocations[0].allocation_type, AllocationType::Full);
    assert_eq!(result.allocations[0].total_amount, Decimal::from(5000));
    Ok(())
}

#[test]
fn test_identical_prices_share_supply_pro_rata() -> Result<()> {
    let bids = vec![bid("second", 50, "10", 5), bid("first", 50, "10", 1)];

    let result = calculate_clearing_price(&bids, 60)?;

    assert_eq!(result.clearing_price, Decimal::from(10));
    assert!(result.pro_rata_applied);
    // Earlier submission ranks first; the later one is the marginal bid
    assert_eq!(result.allocations[0].bid_id, "first");
    assert_eq!(
        result.calculation_details.clearing_bid_id.as_deref(),
        Some("second")
    );
    assert!(result
        .allocations
        .iter()
        .all(|a| a.allocation_type == AllocationType::ProRata && a.allocated_quantity == 10));
    assert_eq!(result.shares_remaining, 40);
    Ok(())
}

#[test]
fn test_undersubscribed_auction_leaves_shares_unsold() -> Result<()> {
    let bids = vec![bid("x", 30, "22.10", 0), bid("y", 10, "18.75", 1)];

    let result = calculate_clearing_price(&bids, 100)?;

    assert_eq!(result.clearing_logic(), ClearingLogic::Undersubscribed);
    assert_eq!(result.clearing_price, Decimal::from_str("18.75")?);
    assert_eq!(result.total_demand, 40);
    assert_eq!(result.shares_remaining, 60);
    assert!(result.rejected_allocations().next().is_none());
    Ok(())
}

#[test]
fn test_empty_auction() -> Result<()> {
    let result = calculate_clearing_price(&[], 500)?;

    assert_eq!(result.clearing_price, Decimal::ZERO);
    assert_eq!(result.shares_remaining, 500);
    assert!(result.allocations.is_empty());

    let summary = AuctionSummary::from_result(&result);
    assert_eq!(summary.total_bids, 0);
    assert_eq!(summary.demand_ratio, Decimal::ZERO);
    Ok(())
}

#[test]
fn test_result_wire_format() -> Result<()> {
    let result = calculate_clearing_price(&reference_bids(), 1000)?;

    let json = serde_json::to_value(&result)?;

    assert_eq!(json["clearing_price"], "120");
    assert_eq!(json["pro_rata_applied"], true);
    assert_eq!(
        json["calculation_details"]["clearing_logic"],
        "pro_rata_at_clearing_price"
    );
    assert_eq!(json["allocations"][2]["allocation_type"], "pro_rata");
    assert_eq!(json["allocations"][2]["pro_rata_percentage"], "0.8");
    assert_eq!(json["allocations"][3]["allocation_type"], "rejected");
    assert!(json["allocations"][0].get("pro_rata_percentage").is_none());

    let steps = json["calculation_details"]["steps"]
        .as_array()
        .map(Vec::len)
        .unwrap_or_default();
    assert_eq!(steps, 3);
    Ok(())
}
