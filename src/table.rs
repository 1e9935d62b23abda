use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::path::Path;

use crate::error::AnalysisError;

/// Columns the rest of the tool depends on. Their absence is a startup
/// failure, never a deferred lookup fault.
pub const REQUIRED_COLUMNS: &[(&str, ColumnKind)] = &[
    ("Medu", ColumnKind::Numeric),
    ("Fedu", ColumnKind::Numeric),
    ("studytime", ColumnKind::Numeric),
    ("sex", ColumnKind::Categorical),
    ("school", ColumnKind::Categorical),
    ("G1", ColumnKind::Numeric),
    ("G2", ColumnKind::Numeric),
    ("G3", ColumnKind::Numeric),
];

/// Classification of a column used to gate which operations apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Every non-numeric dtype is treated as categorical/text.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_type(dtype) {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// A validated reference to a column: name plus kind. Produced by the
/// `require_*` lookups and never persisted — callers revalidate on every
/// request since this is a lookup key, not a cached pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    name: String,
    kind: ColumnKind,
}

impl ColumnRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }
}

/// Options applied when reading the dataset file.
#[derive(Debug, Default, Clone)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }
}

/// The in-memory dataset. Exclusively owned and threaded through every
/// component call; mutated only by the cleaner, once, before the
/// interactive loop starts.
pub struct StudentTable {
    df: DataFrame,
}

impl StudentTable {
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Eager CSV read. The whole dataset lives in memory for the duration
    /// of the session, so there is nothing to gain from a lazy scan.
    pub fn read_csv(path: &Path, options: &LoadOptions) -> Result<Self> {
        let mut read_options = CsvReadOptions::default();
        if let Some(has_header) = options.has_header {
            read_options.has_header = has_header;
        }
        if let Some(delimiter) = options.delimiter {
            read_options = read_options.map_parse_options(|opts| opts.with_separator(delimiter));
        }
        let df = read_options
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?;
        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub(crate) fn replace_dataframe(&mut self, df: DataFrame) {
        self.df = df;
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.df
            .column(name)
            .ok()
            .map(|col| ColumnKind::from_dtype(col.dtype()))
    }

    pub fn series(&self, name: &str) -> Result<&Series, AnalysisError> {
        self.df
            .column(name)
            .map(|col| col.as_materialized_series())
            .map_err(|_| AnalysisError::UnknownColumn(name.to_string()))
    }

    /// Validated lookup: the column must exist.
    pub fn require_column(&self, name: &str) -> Result<ColumnRef, AnalysisError> {
        match self.kind_of(name) {
            Some(kind) => Ok(ColumnRef {
                name: name.to_string(),
                kind,
            }),
            None => Err(AnalysisError::UnknownColumn(name.to_string())),
        }
    }

    /// Validated lookup: the column must exist and be numeric.
    pub fn require_numeric(&self, name: &str) -> Result<ColumnRef, AnalysisError> {
        match self.kind_of(name) {
            Some(ColumnKind::Numeric) => Ok(ColumnRef {
                name: name.to_string(),
                kind: ColumnKind::Numeric,
            }),
            _ => Err(AnalysisError::NotNumericOrUnknown(name.to_string())),
        }
    }

    pub fn numeric_columns(&self) -> Vec<ColumnRef> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<ColumnRef> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<ColumnRef> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| ColumnKind::from_dtype(col.dtype()) == kind)
            .map(|col| ColumnRef {
                name: col.name().to_string(),
                kind,
            })
            .collect()
    }

    /// Checks the dataset carries every column in `REQUIRED_COLUMNS` with
    /// the right kind. Reports all problems at once.
    pub fn validate_required_columns(&self) -> Result<()> {
        let mut problems = Vec::new();
        for (name, kind) in REQUIRED_COLUMNS {
            match self.kind_of(name) {
                None => problems.push(format!("'{}' is missing", name)),
                Some(found) if found != *kind => {
                    problems.push(format!("'{}' should be {} but is {}", name, kind, found))
                }
                Some(_) => {}
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(eyre!(
                "the dataset does not have the expected schema: {}",
                problems.join(", ")
            ))
        }
    }

    /// Rows whose value in `column` is at or above `threshold`, as a new
    /// table. Used by the top-students analysis.
    pub fn filter_at_least(&self, column: &ColumnRef, threshold: f64) -> Result<Self> {
        let df = self
            .df
            .clone()
            .lazy()
            .filter(
                col(column.name())
                    .cast(DataType::Float64)
                    .gt_eq(lit(threshold)),
            )
            .collect()?;
        Ok(Self { df })
    }
}
