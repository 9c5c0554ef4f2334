//! Descriptive statistics table over the numeric attributes of the dataset

use serde::{Deserialize, Serialize};

use super::aggregate::{max, mean, median, min, population_std};
use crate::data::PropertyRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStatistic {
    pub attribute: String,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

type Extractor = fn(&PropertyRecord) -> Option<f64>;

/// Numeric attributes in table order; `id` is identity and excluded
const NUMERIC_ATTRIBUTES: [(&str, Extractor); 18] = [
    ("price", |r| Some(r.price)),
    ("bedrooms", |r| Some(r.bedrooms as f64)),
    ("bathrooms", |r| r.bathrooms),
    ("sqft_living", |r| r.sqft_living),
    ("sqft_lot", |r| Some(r.sqft_lot)),
    ("floors", |r| r.floors),
    ("view", |r| r.view),
    ("condition", |r| Some(r.condition as f64)),
    ("grade", |r| r.grade),
    ("sqft_above", |r| r.sqft_above),
    ("sqft_basement", |r| Some(r.sqft_basement)),
    ("yr_built", |r| Some(r.yr_built as f64)),
    ("yr_renovated", |r| Some(r.yr_renovated as f64)),
    ("zipcode", |r| Some(r.zipcode as f64)),
    ("lat", |r| Some(r.lat)),
    ("long", |r| Some(r.long)),
    ("year", |r| Some(r.year as f64)),
    ("month", |r| Some(r.month as f64)),
];

fn describe(attribute: &str, values: &[f64]) -> Option<DescriptiveStatistic> {
    Some(DescriptiveStatistic {
        attribute: attribute.to_string(),
        mean: mean(values)?,
        median: median(values)?,
        std: population_std(values)?,
        min: min(values)?,
        max: max(values)?,
    })
}

/// One row per numeric attribute. Optional attributes are described over the records
/// that carry them and skipped entirely when no record does.
pub fn descriptive_statistics(records: &[PropertyRecord]) -> Vec<DescriptiveStatistic> {
    NUMERIC_ATTRIBUTES
        .iter()
        .filter_map(|(attribute, extract)| {
            let values: Vec<f64> = records.iter().filter_map(extract).collect();
            describe(attribute, &values)
        })
        .collect()
}
