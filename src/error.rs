use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the sales table. Always fatal: no partial
/// dataset is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("sales file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' missing from header")]
    MissingColumn { column: String },

    #[error("row {row}: quantity '{value}' is not a non-negative integer")]
    InvalidQuantity { row: u64, value: String },

    #[error("row {row}: running item total overflows u64")]
    QuantityOverflow { row: u64 },
}

/// A row whose date text matches none of the accepted formats.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: unparseable date '{value}'")]
pub struct ParseError {
    pub row: u64,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
