//! End-to-end recommendation scenarios over enriched records

mod common;

use houserocket::data::{enrich, Season};
use houserocket::strategy::{BuyFlag, PricingTier};
use houserocket::{DataError, RecommendationEngine, Report, StrategyConfig};
use rust_decimal_macros::dec;

use common::raw;

#[test]
fn test_zipcode_with_two_properties() {
    // {200000 cond 4, 300000 cond 2} -> median 250000
    let records = enrich(vec![
        raw(1, 98101, 200_000.0, 4, 5),
        raw(2, 98101, 300_000.0, 2, 5),
    ])
    .unwrap();

    let buys = RecommendationEngine::with_defaults().buy_decisions(&records);
    assert_eq!(buys[0].zipcode_median, 250_000.0);
    assert_eq!(buys[0].buy, BuyFlag::Yes);
    assert_eq!(buys[1].buy, BuyFlag::No);
}

#[test]
fn test_price_conjunct_alone_blocks_purchase() {
    // Property B is in good condition but priced above the median
    let records = enrich(vec![
        raw(1, 98101, 200_000.0, 4, 5),
        raw(2, 98101, 300_000.0, 5, 5),
    ])
    .unwrap();

    let buys = RecommendationEngine::with_defaults().buy_decisions(&records);
    assert_eq!(buys[1].buy, BuyFlag::No);
}

#[test]
fn test_condition_conjunct_alone_blocks_purchase() {
    let records = enrich(vec![
        raw(1, 98101, 200_000.0, 3, 5),
        raw(2, 98101, 300_000.0, 5, 5),
    ])
    .unwrap();

    let buys = RecommendationEngine::with_defaults().buy_decisions(&records);
    // priced below the median but condition 3 is not above the threshold
    assert_eq!(buys[0].buy, BuyFlag::No);
}

#[test]
fn test_buy_rule_holds_for_every_record() {
    let records = enrich(vec![
        raw(1, 98101, 200_000.0, 4, 1),
        raw(2, 98101, 310_000.0, 5, 2),
        raw(3, 98101, 250_000.0, 3, 3),
        raw(4, 98102, 700_000.0, 4, 4),
        raw(5, 98102, 650_000.0, 1, 8),
        raw(6, 98103, 90_000.0, 2, 11),
    ])
    .unwrap();

    for buy in RecommendationEngine::with_defaults().buy_decisions(&records) {
        let expected = buy.zipcode_median >= buy.property_price && buy.condition > 3;
        assert_eq!(buy.is_buy(), expected, "id {}", buy.id);
    }
}

#[test]
fn test_single_buy_in_season_takes_ten_percent() {
    let records = enrich(vec![raw(1, 98101, 200_000.0, 4, 8)]).unwrap();
    let report = Report::new(records, StrategyConfig::default());

    let strategy = report.sell_strategy().unwrap();
    let decision = &strategy.decisions[0];
    assert_eq!(decision.season, Season::Summer);
    assert_eq!(decision.season_median_price, 200_000.0);
    assert_eq!(decision.pricing, PricingTier::AtPeak);
    assert_eq!(decision.sell_price, 220_000.00);
    assert_eq!(decision.profit, 20_000.00);
}

#[test]
fn test_sell_groups_by_zipcode_and_season() {
    // Same zipcode, different seasons: each is its own seasonal group
    let records = enrich(vec![
        raw(1, 98101, 100_000.0, 4, 7),
        raw(2, 98101, 120_000.0, 5, 7),
        raw(3, 98101, 90_000.0, 4, 1),
        raw(4, 98101, 500_000.0, 4, 2),
    ])
    .unwrap();

    let report = Report::new(records, StrategyConfig::default());
    let strategy = report.sell_strategy().unwrap();

    // zip median 110000 keeps ids 1, 3 (id 2 above median, id 4 above median)
    let ids: Vec<i64> = strategy.decisions.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(strategy.decisions.iter().all(|d| d.pricing == PricingTier::AtPeak));
    assert_eq!(strategy.decisions[0].season, Season::Summer);
    assert_eq!(strategy.decisions[1].season, Season::Winter);
}

#[test]
fn test_profit_is_sum_of_per_property_profit() {
    let records = enrich(vec![
        raw(1, 98101, 101_111.11, 4, 4),
        raw(2, 98101, 150_000.00, 5, 4),
        raw(3, 98101, 222_222.22, 5, 4),
        raw(4, 98101, 400_000.00, 5, 4),
        raw(5, 98102, 333_333.33, 5, 10),
    ])
    .unwrap();

    let strategy = Report::new(records, StrategyConfig::default())
        .sell_strategy()
        .unwrap();
    assert!(!strategy.is_empty());

    let summed: f64 = strategy
        .decisions
        .iter()
        .map(|d| d.sell_price - d.property_price)
        .sum();
    assert!((strategy.total_profit - summed).abs() < 1e-6);

    for d in &strategy.decisions {
        let cents = d.sell_price * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6, "sell price {} not at cents", d.sell_price);
    }
}

#[test]
fn test_custom_markups() {
    let config = StrategyConfig {
        min_condition: 2,
        peak_markup: dec!(1.05),
        off_peak_markup: dec!(1.50),
        price_decimals: 2,
    };
    let records = enrich(vec![
        raw(1, 98101, 100_000.0, 3, 6),
        raw(2, 98101, 200_000.0, 3, 6),
        raw(3, 98101, 300_000.0, 3, 6),
    ])
    .unwrap();

    let strategy = Report::new(records, config).sell_strategy().unwrap();
    // zip median 200000: ids 1, 2 bought; seasonal median over {100000, 200000} = 150000
    assert_eq!(strategy.len(), 2);
    assert_eq!(strategy.decisions[0].sell_price, 150_000.0);
    assert_eq!(strategy.decisions[1].sell_price, 210_000.0);
    assert_eq!(strategy.total_profit, 60_000.0);
}

#[test]
fn test_duplicate_ids_use_last_sale() {
    let records = enrich(vec![
        raw(7, 98101, 900_000.0, 1, 3),
        raw(8, 98101, 300_000.0, 4, 3),
        raw(7, 98101, 250_000.0, 5, 9),
    ])
    .unwrap();

    assert_eq!(records.len(), 2);
    let buys = RecommendationEngine::with_defaults().buy_decisions(&records);
    // median over {300000, 250000} = 275000
    let seven = buys.iter().find(|b| b.id == 7).unwrap();
    assert_eq!(seven.zipcode_median, 275_000.0);
    assert_eq!(seven.buy, BuyFlag::Yes);
    assert_eq!(seven.season, Season::Summer);
}

#[test]
fn test_empty_dataset() {
    let report = Report::from_raw(Vec::new(), StrategyConfig::default()).unwrap();
    assert!(report.descriptive_statistics().is_empty());
    assert!(report.buy_decisions().is_empty());

    let strategy = report.sell_strategy().unwrap();
    assert!(strategy.is_empty());
    assert_eq!(strategy.total_profit, 0.0);
}

#[test]
fn test_oversized_price_fails_instead_of_panicking() {
    let records = enrich(vec![raw(1, 98001, 7.5e28, 5, 7)]).unwrap();
    let report = Report::new(records, StrategyConfig::default());

    assert_eq!(report.buy_decisions()[0].buy, BuyFlag::Yes);
    let err = report.sell_strategy().unwrap_err();
    assert!(matches!(err, DataError::PriceOverflow { id: 1 }));
}
