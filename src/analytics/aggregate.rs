//! Group-level aggregation
//!
//! Median, mean and sum of a numeric value per grouping key. Groups only exist when
//! they have members; nothing is zero-filled. Output maps are ordered by key.

use std::collections::BTreeMap;

use crate::data::{PropertyRecord, Season};

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Exact middle value, or the average of the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation (divides by N)
pub fn population_std(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Collect the values of every group
pub fn group_values<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(value(item));
    }
    groups
}

fn reduce_groups<K: Ord>(
    groups: BTreeMap<K, Vec<f64>>,
    reducer: fn(&[f64]) -> Option<f64>,
) -> BTreeMap<K, f64> {
    groups
        .into_iter()
        .filter_map(|(key, values)| reducer(&values).map(|v| (key, v)))
        .collect()
}

pub fn group_median<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    reduce_groups(group_values(items, key, value), median)
}

/// Median sale price per zipcode, the buy-phase baseline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZipMedian(BTreeMap<u32, f64>);

impl ZipMedian {
    pub fn from_records(records: &[PropertyRecord]) -> Self {
        Self(group_median(records, |r| r.zipcode, |r| r.price))
    }

    pub fn get(&self, zipcode: u32) -> Option<f64> {
        self.0.get(&zipcode).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Median price per (zipcode, season), the sell-phase baseline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonZipMedian(BTreeMap<(u32, Season), f64>);

impl SeasonZipMedian {
    pub fn from_prices<T, FK, FV>(items: &[T], key: FK, price: FV) -> Self
    where
        FK: Fn(&T) -> (u32, Season),
        FV: Fn(&T) -> f64,
    {
        Self(group_median(items, key, price))
    }

    pub fn get(&self, zipcode: u32, season: Season) -> Option<f64> {
        self.0.get(&(zipcode, season)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
