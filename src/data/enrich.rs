//! Feature enrichment
//!
//! Turns validated raw rows into immutable `PropertyRecord`s: duplicate sale ids are
//! collapsed (last occurrence wins) and the categorical attributes used by the
//! analytics are derived from the raw columns.

use std::collections::HashMap;
use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{DataError, DataResult, PropertyRecord, RawRecord};

/// Construction era, split at 1955
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBuild {
    #[serde(rename = "build <1955")]
    Before1955,
    #[serde(rename = "build > 1955")]
    From1955,
}

impl AgeBuild {
    pub fn from_year_built(yr_built: i32) -> Self {
        if yr_built < 1955 {
            AgeBuild::Before1955
        } else {
            AgeBuild::From1955
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBuild::Before1955 => "build <1955",
            AgeBuild::From1955 => "build > 1955",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasementKind {
    Basement,
    NoBasement,
}

impl BasementKind {
    pub fn from_sqft(sqft_basement: f64) -> Self {
        if sqft_basement > 0.0 {
            BasementKind::Basement
        } else {
            BasementKind::NoBasement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BasementKind::Basement => "basement",
            BasementKind::NoBasement => "no_basement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenovationKind {
    Renovation,
    NoRenovation,
}

impl RenovationKind {
    /// A zero renovation year means the property was never renovated
    pub fn from_year_renovated(yr_renovated: i32) -> Self {
        if yr_renovated > 0 {
            RenovationKind::Renovation
        } else {
            RenovationKind::NoRenovation
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenovationKind::Renovation => "renovation",
            RenovationKind::NoRenovation => "no_renovation",
        }
    }
}

/// Coarse bucket over the 1-5 condition scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    /// condition 1-2
    Bad,
    /// condition 3-4
    Regular,
    /// condition 5
    Good,
}

impl ConditionType {
    pub fn from_condition(condition: u8) -> Self {
        match condition {
            0..=2 => ConditionType::Bad,
            3 | 4 => ConditionType::Regular,
            _ => ConditionType::Good,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Bad => "bad",
            ConditionType::Regular => "regular",
            ConditionType::Good => "good",
        }
    }
}

/// Sale season. Upper month bounds are inclusive: March is winter, June spring,
/// September summer, December fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            7..=9 => Season::Summer,
            4..=6 => Season::Spring,
            10..=12 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waterfront {
    No,
    Yes,
}

impl Waterfront {
    /// Map the 0/1 ingestion flag; any other value is rejected
    pub fn from_flag(flag: i64) -> DataResult<Self> {
        match flag {
            0 => Ok(Waterfront::No),
            1 => Ok(Waterfront::Yes),
            other => Err(DataError::undefined_category("waterfront", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Waterfront::No => "no",
            Waterfront::Yes => "yes",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.pad(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(AgeBuild, BasementKind, RenovationKind, ConditionType, Season, Waterfront);

/// Keep only the last occurrence of every id, preserving the order of kept rows
pub fn deduplicate_keep_last(rows: Vec<RawRecord>) -> Vec<RawRecord> {
    let last_index: HashMap<i64, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.id, idx))
        .collect();

    let total = rows.len();
    let deduped: Vec<RawRecord> = rows
        .into_iter()
        .enumerate()
        .filter(|(idx, row)| last_index.get(&row.id) == Some(idx))
        .map(|(_, row)| row)
        .collect();

    if deduped.len() < total {
        debug!("Dropped {} duplicate rows", total - deduped.len());
    }
    deduped
}

/// Derive the categorical attributes for a single row
pub fn enrich_record(raw: RawRecord) -> DataResult<PropertyRecord> {
    let waterfront = Waterfront::from_flag(raw.waterfront)?;
    let year = raw.date.year();
    let month = raw.date.month();

    Ok(PropertyRecord {
        id: raw.id,
        date: raw.date,
        price: raw.price,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        sqft_living: raw.sqft_living,
        sqft_lot: raw.sqft_lot,
        floors: raw.floors,
        waterfront,
        view: raw.view,
        condition: raw.condition,
        grade: raw.grade,
        sqft_above: raw.sqft_above,
        sqft_basement: raw.sqft_basement,
        yr_built: raw.yr_built,
        yr_renovated: raw.yr_renovated,
        zipcode: raw.zipcode,
        lat: raw.lat,
        long: raw.long,
        age_build: AgeBuild::from_year_built(raw.yr_built),
        basement: BasementKind::from_sqft(raw.sqft_basement),
        renovation: RenovationKind::from_year_renovated(raw.yr_renovated),
        condition_type: ConditionType::from_condition(raw.condition),
        year,
        month,
        season: Season::from_month(month),
    })
}

/// Deduplicate and enrich a batch of raw rows
pub fn enrich(rows: Vec<RawRecord>) -> DataResult<Vec<PropertyRecord>> {
    let input_rows = rows.len();
    let records = deduplicate_keep_last(rows)
        .into_iter()
        .map(enrich_record)
        .collect::<DataResult<Vec<_>>>()?;

    info!(
        "Enriched {} records from {} raw rows",
        records.len(),
        input_rows
    );
    Ok(records)
}
