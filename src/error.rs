//! Typed outcomes for user-recoverable analysis failures.
//!
//! Everything here is reported to the console and leaves the session in a
//! re-promptable state; mechanical failures (I/O, polars) travel separately
//! as `color_eyre` reports.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("'{0}' is not a column of this dataset")]
    UnknownColumn(String),

    #[error("'{0}' is not a numeric column or not found in the dataset")]
    NotNumericOrUnknown(String),

    #[error("cannot sample {requested} rows from a dataset of {available}")]
    InsufficientRows { requested: usize, available: usize },

    #[error("the dataset needs at least one numeric and one categorical column to showcase charts")]
    InsufficientColumnDiversity,

    #[error("the tour target column '{0}' is missing from the dataset")]
    MissingTargetColumn(String),

    #[error("column '{0}' has no values to aggregate")]
    NoData(String),

    #[error("'{0}' is not a valid request")]
    InvalidCommand(String),
}
