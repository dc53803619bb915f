//! Errors raised while loading or exporting the dataset
//!
//! Filtering, aggregation and dispatch never fail; loading is the only
//! fallible step of the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Dataset has no header row")]
    MissingHeader,
}

pub type DatasetResult<T> = Result<T, DatasetError>;
