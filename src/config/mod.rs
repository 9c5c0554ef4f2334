use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::strategy::StrategyConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub strategy: StrategyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    /// Abort the whole load on the first malformed row
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
}

const DEFAULT_DATA_PATH: &str = "kc_house_data.csv";

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file - this sets env vars that aren't already set
        dotenv::dotenv().ok();

        let defaults = StrategyConfig::default();

        let config = Config {
            data: DataConfig {
                path: PathBuf::from(env_or("HOUSE_DATA_PATH", DEFAULT_DATA_PATH)),
                strict: env_or("STRICT_INGEST", "false")
                    .parse()
                    .context("Invalid STRICT_INGEST value (use true/false)")?,
            },
            strategy: StrategyConfig {
                min_condition: env_or("BUY_MIN_CONDITION", &defaults.min_condition.to_string())
                    .parse()
                    .context("Invalid BUY_MIN_CONDITION value")?,
                peak_markup: env_or("PEAK_MARKUP", &defaults.peak_markup.to_string())
                    .parse::<Decimal>()
                    .context("Invalid PEAK_MARKUP value")?,
                off_peak_markup: env_or("OFF_PEAK_MARKUP", &defaults.off_peak_markup.to_string())
                    .parse::<Decimal>()
                    .context("Invalid OFF_PEAK_MARKUP value")?,
                price_decimals: env_or("SELL_PRICE_DECIMALS", &defaults.price_decimals.to_string())
                    .parse()
                    .context("Invalid SELL_PRICE_DECIMALS value")?,
            },
            output: OutputConfig {
                dir: env::var("REPORT_OUTPUT_DIR").ok().map(PathBuf::from),
            },
        };

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                path: PathBuf::from(DEFAULT_DATA_PATH),
                strict: false,
            },
            strategy: StrategyConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
