use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

use crate::models::UndersubscribedPricing;

/// Configuration for the clearing engine and its reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearingConfig {
    /// Clearing price used when total demand never reaches supply (default: lowest bid)
    pub undersubscribed_pricing: UndersubscribedPricing,

    /// Decimal places kept on summary ratios (default: 4)
    pub ratio_precision: u32,
}

impl Default for ClearingConfig {
    fn default() -> Self {
        Self {
            undersubscribed_pricing: UndersubscribedPricing::LowestBid,
            ratio_precision: 4,
        }
    }
}

impl ClearingConfig {
    pub const MAX_RATIO_PRECISION: u32 = 12;

    /// Load configuration from an arbitrary key lookup (environment, test maps)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("AUCTION_RATIO_PRECISION") {
            match val.parse::<u32>() {
                Ok(dp) if dp <= Self::MAX_RATIO_PRECISION => {
                    config.ratio_precision = dp;
                    info!("Using custom summary ratio precision: {}", dp);
                }
                Ok(_) => warn!(
                    "Invalid ratio precision: {}, must be <= {}, using default",
                    val,
                    Self::MAX_RATIO_PRECISION
                ),
                Err(_) => warn!("Failed to parse ratio precision: {}, using default", val),
            }
        }

        let reserve_price = match lookup("AUCTION_RESERVE_PRICE") {
            Some(val) => match Decimal::from_str(val.trim()) {
                Ok(price) if price > Decimal::ZERO => Some(price),
                Ok(_) => {
                    warn!("Invalid reserve price: {}, must be > 0, ignoring", val);
                    None
                }
                Err(_) => {
                    warn!("Failed to parse reserve price: {}, ignoring", val);
                    None
                }
            },
            None => None,
        };

        if let Some(val) = lookup("AUCTION_UNDERSUBSCRIBED_PRICING") {
            match val.trim().to_ascii_lowercase().as_str() {
                "lowest_bid" => {
                    config.undersubscribed_pricing = UndersubscribedPricing::LowestBid;
                }
                "reserve_price" => {
                    let price = reserve_price.ok_or_else(|| {
                        anyhow!(
                            "AUCTION_UNDERSUBSCRIBED_PRICING=reserve_price requires a positive AUCTION_RESERVE_PRICE"
                        )
                    })?;
                    config.undersubscribed_pricing = UndersubscribedPricing::ReservePrice(price);
                    info!("Undersubscribed auctions clear at reserve price {}", price);
                }
                _ => warn!(
                    "Unknown undersubscribed pricing mode: {}, expected lowest_bid or reserve_price, using default",
                    val
                ),
            }
        } else if reserve_price.is_some() {
            warn!("AUCTION_RESERVE_PRICE is set but AUCTION_UNDERSUBSCRIBED_PRICING is not reserve_price; reserve ignored");
        }

        Ok(config)
    }
}
