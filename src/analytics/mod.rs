//! Aggregation, descriptive statistics and hypothesis insights over enriched records

pub mod aggregate;
pub mod hypotheses;
pub mod summary;

pub use aggregate::{SeasonZipMedian, ZipMedian};
pub use hypotheses::{evaluate_hypotheses, GroupValue, Hypothesis};
pub use summary::{descriptive_statistics, DescriptiveStatistic};
