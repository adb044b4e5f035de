use polars::prelude::PolarsError;
use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Postal data file not found, looked in: {}", .0.join(", "))]
    DataFileNotFound(Vec<String>),
    #[error("Required column '{0}' missing from postal data")]
    MissingColumn(&'static str),
}
