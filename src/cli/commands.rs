use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use houserocket::analytics::{DescriptiveStatistic, Hypothesis};
use houserocket::data::write_csv;
use houserocket::strategy::{BuyDecision, SellStrategy};
use houserocket::{Config, CsvLoader, Report};

fn banner(title: &str) {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║ {:<58} ║", title);
    println!("╚════════════════════════════════════════════════════════════╝\n");
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load, validate and enrich the configured dataset
pub fn load_report(config: &Config, zipcodes: &[u32]) -> Result<Report> {
    let loader = CsvLoader::new(config.data.strict);
    let outcome = loader
        .load_path(&config.data.path)
        .with_context(|| format!("Failed to load sales data from {}", config.data.path.display()))?;

    if !outcome.rejected.is_empty() {
        warn!(
            "{} rows rejected during ingestion (first at line {})",
            outcome.rejected.len(),
            outcome.rejected[0].line
        );
    }

    let report = Report::from_raw(outcome.records, config.strategy.clone())
        .context("Failed to enrich sales data")?;

    if zipcodes.is_empty() {
        Ok(report)
    } else {
        Ok(report.filter_zipcodes(zipcodes))
    }
}

fn print_statistics(stats: &[DescriptiveStatistic]) {
    println!(
        "{:<15} {:>15} {:>15} {:>15} {:>15} {:>15}",
        "features", "average", "median", "std", "min", "max"
    );
    for s in stats {
        println!(
            "{:<15} {:>15.2} {:>15.2} {:>15.2} {:>15.2} {:>15.2}",
            s.attribute, s.mean, s.median, s.std, s.min, s.max
        );
    }
}

fn print_buys(buys: &[BuyDecision], only_yes: bool) {
    println!(
        "{:<12} {:>8} {:>8} {:>10} {:>14} {:>14} {:>5}",
        "id", "zipcode", "season", "condition", "price", "zip median", "buy"
    );
    for b in buys.iter().filter(|b| !only_yes || b.is_buy()) {
        println!(
            "{:<12} {:>8} {:>8} {:>10} {:>14.2} {:>14.2} {:>5}",
            b.id, b.zipcode, b.season, b.condition, b.property_price, b.zipcode_median, b.buy
        );
    }

    let selected = buys.iter().filter(|b| b.is_buy()).count();
    println!("\n{} of {} properties recommended for purchase", selected, buys.len());
}

fn print_sell(strategy: &SellStrategy) {
    println!(
        "{:<12} {:>8} {:>14} {:>14} {:>14}",
        "id", "season", "price", "sell price", "profit"
    );
    for d in &strategy.decisions {
        println!(
            "{:<12} {:>8} {:>14.2} {:>14.2} {:>14.2}",
            d.id, d.season, d.property_price, d.sell_price, d.profit
        );
    }

    println!("\nBest time to sell:");
    for s in strategy.season_breakdown() {
        println!(
            "   {:<8} {:>6} sales, avg sell price ${:.2}, profit ${:.2}",
            s.season, s.sales, s.mean_sell_price, s.total_profit
        );
    }

    println!(
        "\nThe total profit (profit = selling price - buying price) of the properties in the portfolio is: ${:.2}",
        strategy.total_profit
    );
}

fn print_hypotheses(hypotheses: &[Hypothesis]) {
    println!("{:<4} {:>10} {:>10} {:>8}  {}", "ID", "observed", "claimed", "result", "description");
    for h in hypotheses {
        let observed = h
            .observed_change_pct
            .map(|pct| format!("{:+.1}%", pct))
            .unwrap_or_else(|| "n/a".to_string());
        let result = match h.holds {
            Some(true) => "TRUE",
            Some(false) => "FALSE",
            None => "n/a",
        };
        println!(
            "{:<4} {:>10} {:>9.1}% {:>8}  {}",
            h.id, observed, h.claimed_change_pct, result, h.statement
        );
    }
}

pub fn stats(report: &Report, json: bool) -> Result<()> {
    let stats = report.descriptive_statistics();
    if json {
        return print_json(&stats);
    }

    banner("DESCRIPTIVE STATISTICS");
    print_statistics(&stats);
    Ok(())
}

pub fn buy(report: &Report, only_yes: bool, json: bool) -> Result<()> {
    let buys = report.buy_decisions();
    if json {
        let listed: Vec<&BuyDecision> = buys.iter().filter(|b| !only_yes || b.is_buy()).collect();
        return print_json(&listed);
    }

    banner("WHICH PROPERTIES TO BUY");
    print_buys(&buys, only_yes);
    Ok(())
}

pub fn sell(report: &Report, json: bool) -> Result<()> {
    let strategy = report.sell_strategy()?;
    if json {
        return print_json(&strategy);
    }

    banner("WHEN AND AT WHAT PRICE TO SELL");
    print_sell(&strategy);
    Ok(())
}

pub fn hypotheses(report: &Report, json: bool) -> Result<()> {
    let hypotheses = report.hypotheses();
    if json {
        return print_json(&hypotheses);
    }

    banner("BUSINESS HYPOTHESES");
    print_hypotheses(&hypotheses);
    Ok(())
}

/// Every section of the report, optionally exported as CSV tables
pub fn full_report(report: &Report, output: Option<&Path>, json: bool) -> Result<()> {
    let stats = report.descriptive_statistics();
    let buys = report.buy_decisions();
    let strategy = report.sell_strategy()?;
    let hypotheses = report.hypotheses();

    if let Some(dir) = output {
        write_csv(&stats, dir.join("descriptive_statistics.csv"))?;
        write_csv(&buys, dir.join("buy_strategy.csv"))?;
        write_csv(&strategy.decisions, dir.join("sell_strategy.csv"))?;
        write_csv(&strategy.season_breakdown(), dir.join("season_breakdown.csv"))?;
        info!("Exported report tables to {}", dir.display());
    }

    if json {
        return print_json(&serde_json::json!({
            "records": report.len(),
            "descriptive_statistics": stats,
            "buy_strategy": buys,
            "sell_strategy": strategy,
            "season_breakdown": strategy.season_breakdown(),
            "hypotheses": hypotheses,
        }));
    }

    println!("House Rocket report over {} properties", report.len());

    banner("DESCRIPTIVE STATISTICS");
    print_statistics(&stats);

    banner("BUSINESS HYPOTHESES");
    print_hypotheses(&hypotheses);

    banner("WHICH PROPERTIES TO BUY");
    print_buys(&buys, true);

    banner("WHEN AND AT WHAT PRICE TO SELL");
    print_sell(&strategy);

    Ok(())
}
