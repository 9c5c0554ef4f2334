//! Phase 1: which properties to buy

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::StrategyConfig;
use crate::analytics::ZipMedian;
use crate::data::{PropertyRecord, Season};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyFlag {
    Yes,
    No,
}

impl BuyFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuyFlag::Yes => "yes",
            BuyFlag::No => "no",
        }
    }
}

impl fmt::Display for BuyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyDecision {
    pub id: i64,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
    pub season: Season,
    pub condition: u8,
    pub zipcode_median: f64,
    pub property_price: f64,
    pub buy: BuyFlag,
}

impl BuyDecision {
    pub fn is_buy(&self) -> bool {
        self.buy == BuyFlag::Yes
    }
}

/// Both conditions must hold: priced at or below the zipcode median, and in
/// better-than-threshold condition
pub fn should_buy(zipcode_median: f64, property_price: f64, condition: u8, min_condition: u8) -> bool {
    zipcode_median >= property_price && condition > min_condition
}

pub fn buy_decisions(records: &[PropertyRecord], config: &StrategyConfig) -> Vec<BuyDecision> {
    let zip_medians = ZipMedian::from_records(records);

    let decisions: Vec<BuyDecision> = records
        .iter()
        .filter_map(|record| {
            let Some(zipcode_median) = zip_medians.get(record.zipcode) else {
                warn!("No zipcode median for {} (id {})", record.zipcode, record.id);
                return None;
            };

            let buy = if should_buy(zipcode_median, record.price, record.condition, config.min_condition) {
                BuyFlag::Yes
            } else {
                BuyFlag::No
            };

            debug!(
                "id {}: price ${:.2} vs zip {} median ${:.2}, condition {} -> {}",
                record.id, record.price, record.zipcode, zipcode_median, record.condition, buy
            );

            Some(BuyDecision {
                id: record.id,
                zipcode: record.zipcode,
                lat: record.lat,
                long: record.long,
                season: record.season,
                condition: record.condition,
                zipcode_median,
                property_price: record.price,
                buy,
            })
        })
        .collect();

    info!(
        "Buy phase: {} of {} properties selected across {} zipcodes",
        decisions.iter().filter(|d| d.is_buy()).count(),
        decisions.len(),
        zip_medians.len()
    );
    decisions
}
