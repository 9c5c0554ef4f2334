//! Phase 2: when and for how much to sell

use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{BuyDecision, StrategyConfig};
use crate::analytics::SeasonZipMedian;
use crate::data::{DataError, DataResult, Season};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    /// Price at or above the seasonal zipcode median
    AtPeak,
    /// Price below the seasonal zipcode median
    BelowPeak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellDecision {
    pub id: i64,
    pub zipcode: u32,
    pub season: Season,
    pub condition: u8,
    pub zipcode_median: f64,
    pub season_median_price: f64,
    pub property_price: f64,
    pub pricing: PricingTier,
    pub sell_price: f64,
    pub profit: f64,
}

/// Sales and profit aggregated per season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub sales: usize,
    pub mean_sell_price: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellStrategy {
    pub decisions: Vec<SellDecision>,
    pub total_profit: f64,
}

impl SellStrategy {
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Per-season view of the sell plan, ordered winter through fall
    pub fn season_breakdown(&self) -> Vec<SeasonSummary> {
        let mut seasons: BTreeMap<Season, (usize, f64, f64)> = BTreeMap::new();
        for decision in &self.decisions {
            let entry = seasons.entry(decision.season).or_default();
            entry.0 += 1;
            entry.1 += decision.sell_price;
            entry.2 += decision.profit;
        }

        seasons
            .into_iter()
            .map(|(season, (sales, sell_total, profit))| SeasonSummary {
                season,
                sales,
                mean_sell_price: sell_total / sales as f64,
                total_profit: profit,
            })
            .collect()
    }
}

fn to_decimal(field: &str, value: f64) -> DataResult<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| DataError::NonFinite {
        field: field.to_string(),
    })
}

fn to_float(field: &str, value: Decimal) -> DataResult<f64> {
    value.to_f64().ok_or_else(|| DataError::NonFinite {
        field: field.to_string(),
    })
}

/// Markup tier for a property given its seasonal zipcode median; ties count as peak
pub fn pricing_tier(property_price: f64, season_median_price: f64) -> PricingTier {
    if property_price >= season_median_price {
        PricingTier::AtPeak
    } else {
        PricingTier::BelowPeak
    }
}

/// Resale price for a property, rounded half away from zero. `None` when the
/// marked-up price does not fit in a `Decimal`
pub fn sell_price(
    property_price: Decimal,
    tier: PricingTier,
    config: &StrategyConfig,
) -> Option<Decimal> {
    let markup = match tier {
        PricingTier::AtPeak => config.peak_markup,
        PricingTier::BelowPeak => config.off_peak_markup,
    };
    property_price.checked_mul(markup).map(|price| {
        price.round_dp_with_strategy(config.price_decimals, RoundingStrategy::MidpointAwayFromZero)
    })
}

pub fn sell_strategy(buys: &[BuyDecision], config: &StrategyConfig) -> DataResult<SellStrategy> {
    let selected: Vec<&BuyDecision> = buys.iter().filter(|b| b.is_buy()).collect();
    if selected.is_empty() {
        info!("Sell phase: no properties selected for purchase");
        return Ok(SellStrategy::default());
    }

    let season_medians = SeasonZipMedian::from_prices(
        &selected,
        |b| (b.zipcode, b.season),
        |b| b.property_price,
    );

    let mut decisions = Vec::with_capacity(selected.len());
    let mut total_profit = Decimal::ZERO;

    for buy in selected {
        let Some(season_median_price) = season_medians.get(buy.zipcode, buy.season) else {
            warn!(
                "No seasonal median for zip {} in {} (id {})",
                buy.zipcode, buy.season, buy.id
            );
            continue;
        };

        let tier = pricing_tier(buy.property_price, season_median_price);
        let price = to_decimal("property_price", buy.property_price)?;
        let overflow = || DataError::PriceOverflow { id: buy.id };
        let sell = sell_price(price, tier, config).ok_or_else(overflow)?;
        let profit = sell.checked_sub(price).ok_or_else(overflow)?;
        total_profit = total_profit.checked_add(profit).ok_or_else(overflow)?;

        debug!(
            "id {}: ${:.2} vs {} median ${:.2} ({:?}) -> sell ${}",
            buy.id, buy.property_price, buy.season, season_median_price, tier, sell
        );

        decisions.push(SellDecision {
            id: buy.id,
            zipcode: buy.zipcode,
            season: buy.season,
            condition: buy.condition,
            zipcode_median: buy.zipcode_median,
            season_median_price,
            property_price: buy.property_price,
            pricing: tier,
            sell_price: to_float("sell_price", sell)?,
            profit: to_float("profit", profit)?,
        });
    }

    let total_profit = to_float("total_profit", total_profit)?;
    info!(
        "Sell phase: {} properties priced across {} zipcode/season groups, total profit ${:.2}",
        decisions.len(),
        season_medians.len(),
        total_profit
    );

    Ok(SellStrategy {
        decisions,
        total_profit,
    })
}
