use thiserror::Error;

/// Why a data source could not be turned into a [`Dataset`](crate::data::model::Dataset).
///
/// Loading is all-or-nothing: any of these aborts the whole source and the
/// caller falls back to the synthetic sample data.
///
/// `row` fields are 1-based. For CSV and spreadsheet sources they are the
/// line or sheet row the user sees, header included, so the first data row is
/// row 2. For JSON and Parquet they number the records from 1.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Row {row}, column '{column}': '{value}' is not a valid value")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}, column '{column}': {value} is outside {range}")]
    OutOfRange {
        row: usize,
        column: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("Row {row}, column '{column}': value is missing")]
    MissingValue { row: usize, column: &'static str },

    #[error("Source contains no records")]
    Empty,

    #[error("Invalid source layout: {0}")]
    Layout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
