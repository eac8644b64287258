//! Error types for the forecast_kpi crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the forecast_kpi crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// One or more required columns are absent from the input
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The input file extension is not a supported spreadsheet or CSV
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Error from reading a spreadsheet workbook
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from CSV export
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON export
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from loading settings
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<calamine::Error> for ForecastError {
    fn from(err: calamine::Error) -> Self {
        ForecastError::SpreadsheetError(err.to_string())
    }
}
