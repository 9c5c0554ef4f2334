use thiserror::Error;

/// Error types for loading, enriching and exporting property data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Malformed record at line {line}: {field} - {message}")]
    MalformedRecord {
        line: u64,
        field: String,
        message: String,
    },

    #[error("Undefined category for {field}: {value}")]
    UndefinedCategory { field: String, value: String },

    #[error("Required column missing from input: {0}")]
    MissingColumn(String),

    #[error("Non-finite value in {field} cannot be priced")]
    NonFinite { field: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Sell price for property {id} exceeds the decimal range")]
    PriceOverflow { id: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// True for errors that reject a single row rather than the whole batch
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            DataError::MalformedRecord { .. } | DataError::UndefinedCategory { .. }
        )
    }

    /// Create a malformed-record error with line and field context
    pub fn malformed<F: Into<String>, M: Into<String>>(line: u64, field: F, message: M) -> Self {
        DataError::MalformedRecord {
            line,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an undefined-category error
    pub fn undefined_category<F: Into<String>, V: ToString>(field: F, value: V) -> Self {
        DataError::UndefinedCategory {
            field: field.into(),
            value: value.to_string(),
        }
    }
}
