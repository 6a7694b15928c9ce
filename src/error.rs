use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Required column '{0}' not found in input")]
    MissingColumn(String),

    #[error("Row {row}: required field '{field}' is missing")]
    MissingField { row: usize, field: &'static str },

    #[error("Row {row}: field '{field}' has malformed value '{value}'")]
    MalformedField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
