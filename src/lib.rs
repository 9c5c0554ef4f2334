// House Rocket - Property Buy/Sell Recommendation Report
// Enriches residential sale records, summarizes them, and recommends which
// properties to buy and at what price to resell them.

#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod analytics;
pub mod config;
pub mod data;
pub mod report;
pub mod strategy;

// Re-export commonly used items
pub use config::Config;
pub use data::{CsvLoader, DataError, DataResult, PropertyRecord, RawRecord};
pub use report::Report;
pub use strategy::{BuyDecision, RecommendationEngine, SellDecision, SellStrategy, StrategyConfig};
