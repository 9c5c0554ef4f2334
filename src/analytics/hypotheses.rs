//! Business hypotheses H01-H10
//!
//! Each hypothesis is a grouped aggregation over the enriched dataset plus a claimed
//! percentage change between groups. The observed change is either the change from a
//! baseline group to a comparison group, or for ordered series (bedrooms, years,
//! months) the mean of the step-over-step changes.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::{group_values, mean, median};
use crate::data::{AgeBuild, ConditionType, PropertyRecord, RenovationKind};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Renovations from 2000 onward count as recent
const RECENT_RENOVATION_YEAR: i32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupValue {
    pub group: String,
    pub value: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: String,
    pub statement: String,
    pub groups: Vec<GroupValue>,
    pub claimed_change_pct: f64,
    pub observed_change_pct: Option<f64>,
    /// `None` when the data cannot support a comparison
    pub holds: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
enum Reducer {
    Mean,
    Median,
    Sum,
}

impl Reducer {
    fn apply(self, values: &[f64]) -> Option<f64> {
        match self {
            Reducer::Mean => mean(values),
            Reducer::Median => median(values),
            Reducer::Sum => Some(values.iter().sum()),
        }
    }
}

enum Comparison {
    Pair {
        baseline: &'static str,
        comparison: &'static str,
    },
    OrderedSeries,
}

fn grouped<T, K, FK, FV>(items: &[T], key: FK, value: FV, reducer: Reducer) -> Vec<GroupValue>
where
    K: Ord + Display,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    group_values(items, key, value)
        .into_iter()
        .filter_map(|(key, values)| {
            reducer.apply(&values).map(|value| GroupValue {
                group: key.to_string(),
                value,
                count: values.len(),
            })
        })
        .collect()
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

fn pair_change(groups: &[GroupValue], baseline: &str, comparison: &str) -> Option<f64> {
    let find = |label: &str| groups.iter().find(|g| g.group == label).map(|g| g.value);
    pct_change(find(baseline)?, find(comparison)?)
}

fn mean_step_change(groups: &[GroupValue]) -> Option<f64> {
    if groups.len() < 2 {
        return None;
    }
    let steps = groups
        .windows(2)
        .map(|pair| pct_change(pair[0].value, pair[1].value))
        .collect::<Option<Vec<f64>>>()?;
    mean(&steps)
}

/// A claim holds when the observed change points the same way and is at least as large
pub fn verdict(observed_pct: f64, claimed_pct: f64) -> bool {
    observed_pct.signum() == claimed_pct.signum() && observed_pct.abs() >= claimed_pct.abs()
}

fn hypothesis(
    id: &str,
    statement: &str,
    claimed_change_pct: f64,
    groups: Vec<GroupValue>,
    comparison: Comparison,
) -> Hypothesis {
    let observed_change_pct = match comparison {
        Comparison::Pair {
            baseline,
            comparison,
        } => pair_change(&groups, baseline, comparison),
        Comparison::OrderedSeries => mean_step_change(&groups),
    };
    let holds = observed_change_pct.map(|observed| verdict(observed, claimed_change_pct));

    debug!(
        "{}: observed {:?}% vs claimed {}% -> {:?}",
        id, observed_change_pct, claimed_change_pct, holds
    );

    Hypothesis {
        id: id.to_string(),
        statement: statement.to_string(),
        groups,
        claimed_change_pct,
        observed_change_pct,
        holds,
    }
}

/// Evaluate all ten hypotheses over the enriched dataset
pub fn evaluate_hypotheses(records: &[PropertyRecord]) -> Vec<Hypothesis> {
    let price = |r: &&PropertyRecord| r.price;
    let all: Vec<&PropertyRecord> = records.iter().collect();

    let old_buildings: Vec<&PropertyRecord> = records
        .iter()
        .filter(|r| r.age_build == AgeBuild::Before1955)
        .collect();
    let renovated: Vec<&PropertyRecord> = records
        .iter()
        .filter(|r| r.renovation == RenovationKind::Renovation)
        .collect();
    let bad_condition: Vec<&PropertyRecord> = records
        .iter()
        .filter(|r| r.condition_type == ConditionType::Bad)
        .collect();

    vec![
        hypothesis(
            "H01",
            "Properties that are waterfront are, in average, 30% more expensive.",
            30.0,
            grouped(&all, |r| r.waterfront, price, Reducer::Mean),
            Comparison::Pair {
                baseline: "no",
                comparison: "yes",
            },
        ),
        hypothesis(
            "H02",
            "Properties built before 1955 are, in average, 50% less expensive.",
            -50.0,
            grouped(&all, |r| r.age_build, price, Reducer::Mean),
            Comparison::Pair {
                baseline: "build > 1955",
                comparison: "build <1955",
            },
        ),
        hypothesis(
            "H03",
            "Properties without basement have a sqft_lot 50% bigger than the ones with basement.",
            50.0,
            grouped(&all, |r| r.basement, |r| r.sqft_lot, Reducer::Sum),
            Comparison::Pair {
                baseline: "basement",
                comparison: "no_basement",
            },
        ),
        hypothesis(
            "H04",
            "Properties with higher number of bedrooms are, in average, 10% more expensive.",
            10.0,
            grouped(&all, |r| r.bedrooms, price, Reducer::Mean),
            Comparison::OrderedSeries,
        ),
        hypothesis(
            "H05",
            "Properties that were never renovated are, in average, 20% less expensive.",
            -20.0,
            grouped(&all, |r| r.renovation, price, Reducer::Mean),
            Comparison::Pair {
                baseline: "renovation",
                comparison: "no_renovation",
            },
        ),
        hypothesis(
            "H06",
            "Older properties that were never renovated are 40% less expensive.",
            -40.0,
            grouped(&old_buildings, |r| r.renovation, price, Reducer::Mean),
            Comparison::Pair {
                baseline: "renovation",
                comparison: "no_renovation",
            },
        ),
        hypothesis(
            "H07",
            "Properties that were renovated recently are, in average, 10% more expensive.",
            10.0,
            grouped(
                &renovated,
                |r| {
                    if r.yr_renovated >= RECENT_RENOVATION_YEAR {
                        "new_renovation"
                    } else {
                        "old_renovation"
                    }
                },
                price,
                Reducer::Mean,
            ),
            Comparison::Pair {
                baseline: "old_renovation",
                comparison: "new_renovation",
            },
        ),
        hypothesis(
            "H08",
            "Properties in bad condition but that are waterfront are 10% more expensive.",
            10.0,
            grouped(&bad_condition, |r| r.waterfront, price, Reducer::Mean),
            Comparison::Pair {
                baseline: "no",
                comparison: "yes",
            },
        ),
        hypothesis(
            "H09",
            "The YoY (Year over Year) growth of the price of the properties is of 10%.",
            10.0,
            grouped(&all, |r| r.year, price, Reducer::Median),
            Comparison::OrderedSeries,
        ),
        hypothesis(
            "H10",
            "The MoM (Month over Month) growth of the price of the properties is 15%.",
            15.0,
            month_series(&all),
            Comparison::OrderedSeries,
        ),
    ]
}

/// Mean price per calendar month, labelled with the month abbreviation
fn month_series(records: &[&PropertyRecord]) -> Vec<GroupValue> {
    group_values(records, |r| r.month, |r| r.price)
        .into_iter()
        .filter_map(|(month, values)| {
            let label = MONTH_LABELS.get((month as usize).checked_sub(1)?)?;
            mean(&values).map(|value| GroupValue {
                group: label.to_string(),
                value,
                count: values.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{enrich, RawRecord};
    use chrono::NaiveDate;

    fn group(label: &str, value: f64) -> GroupValue {
        GroupValue {
            group: label.to_string(),
            value,
            count: 1,
        }
    }

    #[test]
    fn test_verdict_requires_direction_and_magnitude() {
        assert!(verdict(35.0, 30.0));
        assert!(verdict(30.0, 30.0));
        assert!(!verdict(25.0, 30.0));
        assert!(!verdict(-35.0, 30.0));
        assert!(verdict(-60.0, -50.0));
        assert!(!verdict(10.0, -50.0));
    }

    #[test]
    fn test_pair_change() {
        let groups = vec![group("no", 100.0), group("yes", 150.0)];
        assert_eq!(pair_change(&groups, "no", "yes"), Some(50.0));
        assert_eq!(pair_change(&groups, "no", "missing"), None);
        assert_eq!(pair_change(&[group("no", 0.0), group("yes", 1.0)], "no", "yes"), None);
    }

    #[test]
    fn test_mean_step_change() {
        let groups = vec![group("1", 100.0), group("2", 110.0), group("3", 132.0)];
        // steps: +10%, +20%
        let observed = mean_step_change(&groups).unwrap();
        assert!((observed - 15.0).abs() < 1e-9);
        assert_eq!(mean_step_change(&groups[..1]), None);
    }

    struct Sale {
        id: i64,
        sold: (i32, u32),
        price: f64,
        bedrooms: u32,
        sqft_lot: f64,
        waterfront: i64,
        condition: u8,
        sqft_basement: f64,
        yr_built: i32,
        yr_renovated: i32,
    }

    fn sample() -> Vec<PropertyRecord> {
        let sales = [
            Sale { id: 1, sold: (2014, 5), price: 200_000.0, bedrooms: 2, sqft_lot: 4000.0, waterfront: 0, condition: 3, sqft_basement: 0.0, yr_built: 1940, yr_renovated: 0 },
            Sale { id: 2, sold: (2014, 5), price: 300_000.0, bedrooms: 3, sqft_lot: 5000.0, waterfront: 0, condition: 4, sqft_basement: 500.0, yr_built: 1940, yr_renovated: 1990 },
            Sale { id: 3, sold: (2014, 6), price: 400_000.0, bedrooms: 3, sqft_lot: 6000.0, waterfront: 0, condition: 3, sqft_basement: 0.0, yr_built: 1980, yr_renovated: 0 },
            Sale { id: 4, sold: (2015, 5), price: 500_000.0, bedrooms: 4, sqft_lot: 6000.0, waterfront: 0, condition: 2, sqft_basement: 800.0, yr_built: 1960, yr_renovated: 2005 },
            Sale { id: 5, sold: (2015, 6), price: 600_000.0, bedrooms: 4, sqft_lot: 8000.0, waterfront: 1, condition: 1, sqft_basement: 0.0, yr_built: 1950, yr_renovated: 0 },
            Sale { id: 6, sold: (2015, 6), price: 800_000.0, bedrooms: 4, sqft_lot: 5000.0, waterfront: 1, condition: 5, sqft_basement: 0.0, yr_built: 2000, yr_renovated: 0 },
        ];

        let rows = sales
            .iter()
            .map(|s| RawRecord {
                id: s.id,
                date: NaiveDate::from_ymd_opt(s.sold.0, s.sold.1, 1).unwrap(),
                price: s.price,
                bedrooms: s.bedrooms,
                bathrooms: None,
                sqft_living: None,
                sqft_lot: s.sqft_lot,
                floors: None,
                waterfront: s.waterfront,
                view: None,
                condition: s.condition,
                grade: None,
                sqft_above: None,
                sqft_basement: s.sqft_basement,
                yr_built: s.yr_built,
                yr_renovated: s.yr_renovated,
                zipcode: 98001,
                lat: 47.5,
                long: -122.3,
            })
            .collect();
        enrich(rows).unwrap()
    }

    fn observed(hypotheses: &[Hypothesis], id: &str) -> (f64, Option<bool>) {
        let h = hypotheses.iter().find(|h| h.id == id).unwrap();
        (h.observed_change_pct.unwrap(), h.holds)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_pair_hypotheses_over_sample() {
        let hypotheses = evaluate_hypotheses(&sample());
        assert_eq!(hypotheses.len(), 10);

        // waterfront: no 350000 -> yes 700000
        let (pct, holds) = observed(&hypotheses, "H01");
        assert_close(pct, 100.0);
        assert_eq!(holds, Some(true));

        // built from 1955 (1700000 / 3) -> before 1955 (1100000 / 3)
        let (pct, holds) = observed(&hypotheses, "H02");
        assert_close(pct, (11.0 / 17.0 - 1.0) * 100.0);
        assert_eq!(holds, Some(false));

        // summed lot area: basement 11000 -> no basement 23000
        let (pct, holds) = observed(&hypotheses, "H03");
        assert_close(pct, (23_000.0 / 11_000.0 - 1.0) * 100.0);
        assert_eq!(holds, Some(true));

        // renovated 400000 -> never renovated 500000, opposite of the claimed -20%
        let (pct, holds) = observed(&hypotheses, "H05");
        assert_close(pct, 25.0);
        assert_eq!(holds, Some(false));

        // only pre-1955 buildings: renovated 300000 -> never renovated 400000
        let (pct, _) = observed(&hypotheses, "H06");
        assert_close(pct, 100.0 / 3.0);

        // renovated 1990 (300000) -> renovated 2005 (500000)
        let (pct, holds) = observed(&hypotheses, "H07");
        assert_close(pct, 200.0 / 3.0);
        assert_eq!(holds, Some(true));

        // bad condition only: no 500000 -> yes 600000
        let (pct, holds) = observed(&hypotheses, "H08");
        assert_close(pct, 20.0);
        assert_eq!(holds, Some(true));
    }

    #[test]
    fn test_series_hypotheses_over_sample() {
        let hypotheses = evaluate_hypotheses(&sample());

        // mean price by bedrooms: 200000, 350000, 1900000 / 3
        let h04 = hypotheses.iter().find(|h| h.id == "H04").unwrap();
        let labels: Vec<&str> = h04.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, vec!["2", "3", "4"]);
        let expected = (75.0 + (1_900_000.0 / 3.0 / 350_000.0 - 1.0) * 100.0) / 2.0;
        assert_close(h04.observed_change_pct.unwrap(), expected);

        // median by year, not mean: 300000 -> 600000
        let (pct, holds) = observed(&hypotheses, "H09");
        assert_close(pct, 100.0);
        assert_eq!(holds, Some(true));

        // mean by month: May 1000000 / 3 -> Jun 600000
        let h10 = hypotheses.iter().find(|h| h.id == "H10").unwrap();
        let labels: Vec<&str> = h10.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, vec!["May", "Jun"]);
        assert_close(h10.observed_change_pct.unwrap(), 80.0);
    }
}
