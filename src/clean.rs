//! One-shot dataset cleaning: fill missing text cells, then drop duplicate
//! rows. Runs exactly once at startup, before the interactive loop.

use color_eyre::Result;
use polars::prelude::*;
use std::collections::HashSet;

use crate::table::StudentTable;

/// The explicit marker for a missing text cell. Numeric cells keep the
/// polars null as their unavailable marker so aggregations skip them.
pub const UNAVAILABLE: &str = "N/A";

/// What a cleaning pass changed. A second pass on the same table reports
/// zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_dropped: usize,
    pub cells_filled: usize,
}

impl CleanReport {
    pub fn is_noop(&self) -> bool {
        self.rows_dropped == 0 && self.cells_filled == 0
    }
}

/// Cleans the table in place: replaces nulls in categorical/text columns
/// with the `"N/A"` sentinel, then drops every row that exactly duplicates
/// an earlier row (first occurrence kept, comparison over all columns,
/// nulls equal to nulls).
///
/// Filling happens before deduplication so that rows differing only by
/// null-versus-`"N/A"` collapse in the same pass, which keeps the whole
/// operation idempotent.
pub fn clean(table: &mut StudentTable) -> Result<CleanReport> {
    let cells_filled = fill_missing_text(table)?;
    let rows_dropped = drop_duplicate_rows(table)?;

    tracing::debug!(rows_dropped, cells_filled, "cleaned dataset");

    Ok(CleanReport {
        rows_dropped,
        cells_filled,
    })
}

fn fill_missing_text(table: &mut StudentTable) -> Result<usize> {
    let text_columns: Vec<String> = table
        .categorical_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    if text_columns.is_empty() {
        return Ok(0);
    }

    let cells_filled: usize = text_columns
        .iter()
        .filter_map(|name| table.dataframe().column(name).ok())
        .map(|col| col.null_count())
        .sum();
    if cells_filled == 0 {
        return Ok(0);
    }

    let fill_exprs: Vec<Expr> = text_columns
        .iter()
        .map(|name| col(name.as_str()).fill_null(lit(UNAVAILABLE)))
        .collect();
    let df = table
        .dataframe()
        .clone()
        .lazy()
        .with_columns(fill_exprs)
        .collect()?;
    table.replace_dataframe(df);

    Ok(cells_filled)
}

fn drop_duplicate_rows(table: &mut StudentTable) -> Result<usize> {
    let df = table.dataframe();
    let height = df.height();
    if height == 0 {
        return Ok(0);
    }

    let columns = df.get_columns();
    let mut seen: HashSet<String> = HashSet::with_capacity(height);
    let mut keep: Vec<u32> = Vec::with_capacity(height);

    for row in 0..height {
        let mut key = String::new();
        for col in columns {
            let value = col.get(row)?;
            match value {
                // distinct marker so a null never collides with a literal
                AnyValue::Null => key.push('\u{1}'),
                value => key.push_str(&value.str_value()),
            }
            key.push('\u{1f}');
        }
        if seen.insert(key) {
            keep.push(row as u32);
        }
    }

    let rows_dropped = height - keep.len();
    if rows_dropped > 0 {
        let indices = UInt32Chunked::from_vec("keep".into(), keep);
        let deduped = df.take(&indices)?;
        table.replace_dataframe(deduped);
    }

    Ok(rows_dropped)
}
