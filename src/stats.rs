//! Extrema and averages over numeric columns, with typed outcomes for
//! unknown/non-numeric columns and the all-missing case.

use polars::prelude::*;

use crate::error::AnalysisError;
use crate::table::StudentTable;

/// Minimum and maximum over the non-missing values of a numeric column.
pub fn min_max(table: &StudentTable, column: &str) -> Result<(f64, f64), AnalysisError> {
    let values = numeric_values(table, column)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok((min, max))
}

/// Arithmetic mean over the non-missing values of a numeric column. An
/// all-missing column is the typed `NoData` outcome, never NaN.
pub fn average(table: &StudentTable, column: &str) -> Result<f64, AnalysisError> {
    let values = numeric_values(table, column)?;
    let sum: f64 = values.iter().sum();
    Ok(sum / values.len() as f64)
}

/// Quantile over the sorted non-missing values, nearest-rank style:
/// the value at index `round(q * (n - 1))`.
pub fn quantile(table: &StudentTable, column: &str, q: f64) -> Result<f64, AnalysisError> {
    let mut values = numeric_values(table, column)?;
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    let idx = ((q.clamp(0.0, 1.0)) * (n - 1) as f64).round() as usize;
    Ok(values[idx.min(n - 1)])
}

/// The column's non-missing values as f64. Validates existence and kind
/// first; empty output becomes the `NoData` outcome so callers never
/// divide by zero or fold an empty sequence.
fn numeric_values(table: &StudentTable, column: &str) -> Result<Vec<f64>, AnalysisError> {
    let column = table.require_numeric(column)?;
    let series = table.series(column.name())?;
    let cast = series
        .cast(&DataType::Float64)
        .map_err(|_| AnalysisError::NotNumericOrUnknown(column.name().to_string()))?;
    let ca = cast
        .f64()
        .map_err(|_| AnalysisError::NotNumericOrUnknown(column.name().to_string()))?;
    let values: Vec<f64> = ca.into_iter().flatten().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Err(AnalysisError::NoData(column.name().to_string()));
    }
    Ok(values)
}
