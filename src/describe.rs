//! Dataset shape/type summaries and per-column value-frequency tables.

use polars::prelude::*;

use crate::clean::UNAVAILABLE;
use crate::error::AnalysisError;
use crate::table::StudentTable;

/// Row count, column count, and the declared kind of every column, in
/// column order.
pub fn describe(table: &StudentTable) -> String {
    let mut text = format!(
        "The dataset contains {} rows and {} columns.\n",
        table.height(),
        table.width()
    );
    text.push_str("The kind of each column is:\n");
    for col in table.dataframe().get_columns() {
        let kind = crate::table::ColumnKind::from_dtype(col.dtype());
        text.push_str(&format!("  {:<12} {}\n", col.name().as_str(), kind));
    }
    text
}

/// Every distinct observed value of the column paired with its occurrence
/// count, ordered by descending count with ties broken by first appearance
/// in row order. Missing cells count under the `"N/A"` sentinel.
pub fn distribution(
    table: &StudentTable,
    column: &str,
) -> Result<Vec<(String, usize)>, AnalysisError> {
    let column = table.require_column(column)?;
    let series = table.series(column.name())?;

    // counted by hand rather than through value_counts: the tie order
    // (first-seen) is part of the contract here
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for value in series.iter() {
        let key = match value {
            AnyValue::Null => UNAVAILABLE.to_string(),
            value => value.str_value().to_string(),
        };
        match index.get(&key) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }

    // stable, so first-seen order survives equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StudentTable {
        let df = df!(
            "school" => &["GP", "MS", "GP", "GP"],
            "G1" => &[Some(10i64), None, Some(10), Some(8)],
        )
        .unwrap();
        StudentTable::from_dataframe(df)
    }

    #[test]
    fn describe_reports_shape_and_kinds() {
        let text = describe(&table());
        assert!(text.contains("4 rows and 2 columns"));
        assert!(text.contains("school"));
        assert!(text.contains("categorical"));
        assert!(text.contains("numeric"));
    }

    #[test]
    fn counts_sum_to_row_count() {
        let table = table();
        let dist = distribution(&table, "G1").unwrap();
        let total: usize = dist.iter().map(|(_, n)| n).sum();
        assert_eq!(total, table.height());
    }

    #[test]
    fn nulls_count_under_the_sentinel() {
        let dist = distribution(&table(), "G1").unwrap();
        assert!(dist.contains(&(UNAVAILABLE.to_string(), 1)));
    }

    #[test]
    fn descending_count_with_first_seen_ties() {
        let dist = distribution(&table(), "G1").unwrap();
        assert_eq!(dist[0], ("10".to_string(), 2));
        // "N/A" appears in row order before "8", so the tie resolves that way
        assert_eq!(dist[1].1, 1);
        assert_eq!(dist[1].0, UNAVAILABLE);
        assert_eq!(dist[2], ("8".to_string(), 1));
    }

    #[test]
    fn unknown_column_is_a_typed_error() {
        assert_eq!(
            distribution(&table(), "nonexistent"),
            Err(AnalysisError::UnknownColumn("nonexistent".to_string()))
        );
    }
}
