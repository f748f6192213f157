use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::bid::BidSubmission;
use crate::error::Result;

/// One auction's clearing input as handed over by the listing system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionInput {
    #[serde(default)]
    pub auction_id: Option<Uuid>,
    pub total_supply: i64,
    #[serde(default)]
    pub bids: Vec<BidSubmission>,
}

impl AuctionInput {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
