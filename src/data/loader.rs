//! CSV loader for property sale records
//!
//! Reads the King County sales layout (`kc_house_data.csv`). Rows that are missing a
//! required field or carry a value of the wrong type are rejected one by one; in
//! strict mode the first rejection aborts the load instead.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::validation::validate_raw_record;
use super::{DataError, DataResult, RawRecord};

/// Columns every input file must provide
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "id",
    "date",
    "price",
    "bedrooms",
    "sqft_lot",
    "waterfront",
    "condition",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "zipcode",
    "lat",
    "long",
];

const DATE_TIME_FORMATS: [&str; 2] = ["%Y%m%dT%H%M%S", "%Y-%m-%d %H:%M:%S"];

/// A row that was rejected during ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

/// Accepted rows plus the rows rejected along the way
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<RawRecord>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    strict: bool,
}

impl CsvLoader {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Load rows from a CSV file on disk
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> DataResult<LoadOutcome> {
        info!("Loading property records from {}", path.as_ref().display());
        let file = File::open(path.as_ref())?;
        self.load_reader(file)
    }

    /// Load rows from any CSV source with a header line
    pub fn load_reader<R: Read>(&self, reader: R) -> DataResult<LoadOutcome> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_string(), idx))
            .collect();

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !columns.contains_key(**column))
        {
            return Err(DataError::MissingColumn(missing.to_string()));
        }

        let mut outcome = LoadOutcome::default();
        for result in reader.records() {
            let (line, parsed) = match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    let row = RowParser {
                        record: &record,
                        columns: &columns,
                        line,
                    };
                    let parsed = row
                        .parse()
                        .and_then(|raw| validate_raw_record(&raw, line).map(|_| raw));
                    (line, parsed)
                }
                Err(e) => match undecodable_row(&e, &columns) {
                    Some(rejection) => rejection,
                    None => return Err(e.into()),
                },
            };

            match parsed {
                Ok(raw) => outcome.records.push(raw),
                Err(e) if e.is_row_level() && !self.strict => {
                    warn!("Rejected row at line {}: {}", line, e);
                    outcome.rejected.push(RejectedRow {
                        line,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Loaded {} rows ({} rejected)",
            outcome.records.len(),
            outcome.rejected.len()
        );
        Ok(outcome)
    }
}

/// A row whose bytes are not valid UTF-8 is rejected on its own; any other reader
/// error returns `None` and aborts the load
fn undecodable_row(
    err: &csv::Error,
    columns: &HashMap<String, usize>,
) -> Option<(u64, DataResult<RawRecord>)> {
    let csv::ErrorKind::Utf8 { pos, err: utf8 } = err.kind() else {
        return None;
    };
    let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
    let field = columns
        .iter()
        .find(|(_, idx)| **idx == utf8.field())
        .map(|(name, _)| name.as_str())
        .unwrap_or("record");

    Some((
        line,
        Err(DataError::malformed(line, field, "Invalid UTF-8 in value")),
    ))
}

struct RowParser<'a> {
    record: &'a StringRecord,
    columns: &'a HashMap<String, usize>,
    line: u64,
}

impl RowParser<'_> {
    fn parse(&self) -> DataResult<RawRecord> {
        Ok(RawRecord {
            id: self.integral("id")?,
            date: self.date("date")?,
            price: self.required("price")?,
            bedrooms: self.integral("bedrooms")?,
            bathrooms: self.optional("bathrooms")?,
            sqft_living: self.optional("sqft_living")?,
            sqft_lot: self.required("sqft_lot")?,
            floors: self.optional("floors")?,
            waterfront: self.integral("waterfront")?,
            view: self.optional("view")?,
            condition: self.integral("condition")?,
            grade: self.optional("grade")?,
            sqft_above: self.optional("sqft_above")?,
            sqft_basement: self.required("sqft_basement")?,
            yr_built: self.integral("yr_built")?,
            yr_renovated: self.integral("yr_renovated")?,
            zipcode: self.integral("zipcode")?,
            lat: self.required("lat")?,
            long: self.required("long")?,
        })
    }

    fn value(&self, field: &str) -> Option<&str> {
        self.columns
            .get(field)
            .and_then(|idx| self.record.get(*idx))
            .filter(|value| !value.is_empty())
    }

    fn present(&self, field: &str) -> DataResult<&str> {
        self.value(field)
            .ok_or_else(|| DataError::malformed(self.line, field, "Missing required value"))
    }

    fn required<T: FromStr>(&self, field: &str) -> DataResult<T> {
        let value = self.present(field)?;
        value.parse().map_err(|_| {
            DataError::malformed(self.line, field, format!("Invalid value '{}'", value))
        })
    }

    fn optional<T: FromStr>(&self, field: &str) -> DataResult<Option<T>> {
        match self.value(field) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| {
                DataError::malformed(self.line, field, format!("Invalid value '{}'", value))
            }),
        }
    }

    /// Integer columns occasionally arrive as "3.0"; accept whole-valued floats
    fn integral<T: TryFrom<i64>>(&self, field: &str) -> DataResult<T> {
        let value = self.present(field)?;
        let invalid =
            || DataError::malformed(self.line, field, format!("Expected integer, got '{}'", value));

        let whole = match value.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                let float: f64 = value.parse().map_err(|_| invalid())?;
                // i64::MIN is exactly -2^63; anything at or past 2^63 would saturate
                if !float.is_finite()
                    || float.fract() != 0.0
                    || float < i64::MIN as f64
                    || float >= -(i64::MIN as f64)
                {
                    return Err(invalid());
                }
                float as i64
            }
        };
        T::try_from(whole).map_err(|_| invalid())
    }

    fn date(&self, field: &str) -> DataResult<NaiveDate> {
        let value = self.present(field)?;
        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|dt| dt.date())
            .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
            .ok_or_else(|| {
                DataError::malformed(self.line, field, format!("Unrecognized date '{}'", value))
            })
    }
}
