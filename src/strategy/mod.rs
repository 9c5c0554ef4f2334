//! Buy/sell recommendation engine
//!
//! Phase 1 flags properties priced at or below their zipcode median that are in
//! above-average condition. Phase 2 prices the flagged properties for resale against
//! the median of their (zipcode, season) peers within the flagged set.

pub mod buy;
pub mod sell;

pub use buy::{BuyDecision, BuyFlag};
pub use sell::{PricingTier, SeasonSummary, SellDecision, SellStrategy};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::{DataResult, PropertyRecord};

/// Thresholds and markups used by the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Buy only when condition is strictly above this value
    pub min_condition: u8,

    /// Markup when the price is at or above its seasonal zipcode median
    pub peak_markup: Decimal,

    /// Markup when the price is below its seasonal zipcode median
    pub off_peak_markup: Decimal,

    /// Decimal places kept on sell prices (midpoints round away from zero)
    pub price_decimals: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            min_condition: 3,
            peak_markup: Decimal::new(110, 2),     // 1.10
            off_peak_markup: Decimal::new(130, 2), // 1.30
            price_decimals: 2,
        }
    }
}

pub struct RecommendationEngine {
    config: StrategyConfig,
}

impl RecommendationEngine {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(StrategyConfig::default())
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Phase 1: one decision per record, input order preserved
    pub fn buy_decisions(&self, records: &[PropertyRecord]) -> Vec<BuyDecision> {
        buy::buy_decisions(records, &self.config)
    }

    /// Phase 2: resale pricing over the records flagged for purchase
    pub fn sell_strategy(&self, buys: &[BuyDecision]) -> DataResult<SellStrategy> {
        sell::sell_strategy(buys, &self.config)
    }

    /// Run both phases end to end
    pub fn recommend(
        &self,
        records: &[PropertyRecord],
    ) -> DataResult<(Vec<BuyDecision>, SellStrategy)> {
        let buys = self.buy_decisions(records);
        let strategy = self.sell_strategy(&buys)?;

        info!(
            "Recommendation complete: {} evaluated, {} to buy, total profit ${:.2}",
            buys.len(),
            strategy.len(),
            strategy.total_profit
        );
        Ok((buys, strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{enrich, RawRecord};
    use chrono::NaiveDate;

    fn raw(id: i64, zipcode: u32, price: f64, condition: u8, month: u32) -> RawRecord {
        RawRecord {
            id,
            date: NaiveDate::from_ymd_opt(2014, month, 10).unwrap(),
            price,
            bedrooms: 3,
            bathrooms: None,
            sqft_living: None,
            sqft_lot: 5000.0,
            floors: None,
            waterfront: 0,
            view: None,
            condition,
            grade: None,
            sqft_above: None,
            sqft_basement: 0.0,
            yr_built: 1980,
            yr_renovated: 0,
            zipcode,
            lat: 47.5,
            long: -122.3,
        }
    }

    #[test]
    fn test_default_config() {
        let config = StrategyConfig::default();
        assert_eq!(config.min_condition, 3);
        assert_eq!(config.peak_markup.to_string(), "1.10");
        assert_eq!(config.off_peak_markup.to_string(), "1.30");
        assert_eq!(config.price_decimals, 2);
    }

    #[test]
    fn test_recommend_end_to_end() {
        let records = enrich(vec![
            raw(1, 98001, 200_000.0, 4, 7),
            raw(2, 98001, 300_000.0, 2, 7),
            raw(3, 98002, 500_000.0, 5, 1),
        ])
        .unwrap();

        let engine = RecommendationEngine::with_defaults();
        let (buys, strategy) = engine.recommend(&records).unwrap();

        assert_eq!(buys.len(), 3);
        let flags: Vec<BuyFlag> = buys.iter().map(|b| b.buy).collect();
        assert_eq!(flags, vec![BuyFlag::Yes, BuyFlag::No, BuyFlag::Yes]);

        assert_eq!(strategy.len(), 2);
        assert_eq!(strategy.decisions[0].sell_price, 220_000.0);
        assert_eq!(strategy.decisions[1].sell_price, 550_000.0);
        assert_eq!(strategy.total_profit, 70_000.0);
    }

    #[test]
    fn test_recommend_empty() {
        let engine = RecommendationEngine::with_defaults();
        let (buys, strategy) = engine.recommend(&[]).unwrap();
        assert!(buys.is_empty());
        assert!(strategy.is_empty());
        assert_eq!(strategy.total_profit, 0.0);
    }
}
