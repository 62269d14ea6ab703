use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a student table.
#[derive(Error, Debug)]
pub enum DataError {
    /// The file extension does not map to a known format.
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// The file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the header (or from a JSON object).
    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    /// A numeric cell did not parse.
    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    /// A numeric cell parsed but lies outside the column's valid range.
    #[error("Row {row}, column '{column}': {value} is out of range")]
    OutOfRange {
        row: usize,
        column: String,
        value: f64,
    },

    /// A categorical cell was empty.
    #[error("Row {row}, column '{column}': empty value")]
    EmptyCategory { row: usize, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Any structural problem that is not tied to one cell.
    #[error("{0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_cell() {
        let err = DataError::InvalidNumber {
            row: 4,
            column: "promedio_final".into(),
            value: "abc".into(),
        };
        assert_eq!(
            err.to_string(),
            "Row 4, column 'promedio_final': 'abc' is not a number"
        );

        let err = DataError::MissingColumn {
            column: "grupo".into(),
        };
        assert_eq!(err.to_string(), "Missing required column 'grupo'");
    }
}
