//! Report facade
//!
//! Owns one enriched dataset and answers the read operations of the presentation
//! layer. Loading happens outside; nothing here is cached process-wide.

use tracing::info;

use crate::analytics::{descriptive_statistics, evaluate_hypotheses, DescriptiveStatistic, Hypothesis};
use crate::data::{enrich, DataResult, PropertyRecord, RawRecord};
use crate::strategy::{BuyDecision, RecommendationEngine, SellStrategy, StrategyConfig};

pub struct Report {
    records: Vec<PropertyRecord>,
    engine: RecommendationEngine,
}

impl Report {
    pub fn new(records: Vec<PropertyRecord>, config: StrategyConfig) -> Self {
        Self {
            records,
            engine: RecommendationEngine::new(config),
        }
    }

    /// Enrich raw rows and build a report over them
    pub fn from_raw(rows: Vec<RawRecord>, config: StrategyConfig) -> DataResult<Self> {
        Ok(Self::new(enrich(rows)?, config))
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Report restricted to the given zipcodes; an empty selection keeps everything
    pub fn filter_zipcodes(&self, zipcodes: &[u32]) -> Self {
        let records: Vec<PropertyRecord> = if zipcodes.is_empty() {
            self.records.clone()
        } else {
            self.records
                .iter()
                .filter(|r| zipcodes.contains(&r.zipcode))
                .cloned()
                .collect()
        };

        info!(
            "Zipcode filter kept {} of {} records",
            records.len(),
            self.records.len()
        );
        Self::new(records, self.engine.config().clone())
    }

    pub fn descriptive_statistics(&self) -> Vec<DescriptiveStatistic> {
        descriptive_statistics(&self.records)
    }

    pub fn buy_decisions(&self) -> Vec<BuyDecision> {
        self.engine.buy_decisions(&self.records)
    }

    pub fn sell_strategy(&self) -> DataResult<SellStrategy> {
        let buys = self.buy_decisions();
        self.engine.sell_strategy(&buys)
    }

    pub fn hypotheses(&self) -> Vec<Hypothesis> {
        evaluate_hypotheses(&self.records)
    }
}
