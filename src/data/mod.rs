//! Data pipeline module for loading, enriching and exporting property sale records
//! Provides row-level validation so malformed input never reaches the analytics

pub mod enrich;
pub mod errors;
pub mod export;
pub mod loader;

// Re-export commonly used types
pub use enrich::{
    enrich, AgeBuild, BasementKind, ConditionType, RenovationKind, Season, Waterfront,
};
pub use errors::{DataError, DataResult};
pub use export::write_csv;
pub use loader::{CsvLoader, LoadOutcome, RejectedRow};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Property sale row as it arrives from the loader, before enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: Option<f64>,
    pub sqft_living: Option<f64>,
    pub sqft_lot: f64,
    pub floors: Option<f64>,
    pub waterfront: i64, // 0/1 flag
    pub view: Option<f64>,
    pub condition: u8,
    pub grade: Option<f64>,
    pub sqft_above: Option<f64>,
    pub sqft_basement: f64,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
}

/// Enriched property record, one per distinct sale id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: Option<f64>,
    pub sqft_living: Option<f64>,
    pub sqft_lot: f64,
    pub floors: Option<f64>,
    pub waterfront: Waterfront,
    pub view: Option<f64>,
    pub condition: u8,
    pub grade: Option<f64>,
    pub sqft_above: Option<f64>,
    pub sqft_basement: f64,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,

    // Derived attributes
    pub age_build: AgeBuild,
    pub basement: BasementKind,
    pub renovation: RenovationKind,
    pub condition_type: ConditionType,
    pub year: i32,
    pub month: u32,
    pub season: Season,
}

/// Validation helpers
pub mod validation {
    use super::*;

    /// Validate a parsed row; `line` is the 1-based source line for error context
    pub fn validate_raw_record(record: &RawRecord, line: u64) -> DataResult<()> {
        if !record.price.is_finite() || record.price <= 0.0 {
            return Err(DataError::malformed(line, "price", "Price must be a positive number"));
        }

        if !(1..=5).contains(&record.condition) {
            return Err(DataError::malformed(
                line,
                "condition",
                format!("Condition must be between 1 and 5, got {}", record.condition),
            ));
        }

        if !record.lat.is_finite() || !record.long.is_finite() {
            return Err(DataError::malformed(line, "lat_long", "Coordinates must be finite"));
        }

        if !record.sqft_lot.is_finite() || !record.sqft_basement.is_finite() {
            return Err(DataError::malformed(line, "sqft", "Areas must be finite"));
        }

        if record.waterfront != 0 && record.waterfront != 1 {
            return Err(DataError::undefined_category("waterfront", record.waterfront));
        }

        Ok(())
    }
}
