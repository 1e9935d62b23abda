mod common;

use color_eyre::Result;
use studex::clean;
use studex::error::AnalysisError;
use studex::stats;

#[test]
fn cleaning_drops_duplicate_pairs_and_keeps_the_missing_cell() -> Result<()> {
    let mut table = common::student_table();
    assert_eq!(table.height(), 12);

    let report = clean::clean(&mut table)?;

    // two duplicate pairs collapse; the null G1 cell stays a null
    assert_eq!(report.rows_dropped, 2);
    assert_eq!(table.height(), 10);
    assert_eq!(table.series("G1").unwrap().null_count(), 1);
    Ok(())
}

#[test]
fn cleaned_table_has_no_duplicate_rows() -> Result<()> {
    let mut table = common::student_table();
    clean::clean(&mut table)?;

    let df = table.dataframe();
    let mut keys: Vec<String> = Vec::new();
    for row in 0..df.height() {
        let mut key = String::new();
        for col in df.get_columns() {
            key.push_str(&format!("{:?}|", col.get(row)?));
        }
        keys.push(key);
    }
    let distinct: std::collections::HashSet<&String> = keys.iter().collect();
    assert_eq!(distinct.len(), keys.len());
    Ok(())
}

#[test]
fn cleaning_is_idempotent() -> Result<()> {
    let mut table = common::student_table();
    clean::clean(&mut table)?;
    let first_pass = table.dataframe().clone();

    let report = clean::clean(&mut table)?;
    assert!(report.is_noop());
    assert!(table.dataframe().equals_missing(&first_pass));
    Ok(())
}

#[test]
fn min_max_on_cleaned_table_covers_the_nine_present_values() -> Result<()> {
    let mut table = common::student_table();
    clean::clean(&mut table)?;

    // 10 rows remain, one G1 is missing, so min/max range over 9 values
    let (min, max) = stats::min_max(&table, "G1").map_err(|e| color_eyre::eyre::eyre!(e))?;
    assert_eq!(min, 6.0);
    assert_eq!(max, 15.0);
    Ok(())
}

#[test]
fn extrema_errors_are_typed_after_cleaning() -> Result<()> {
    let mut table = common::student_table();
    clean::clean(&mut table)?;

    assert_eq!(
        stats::min_max(&table, "school"),
        Err(AnalysisError::NotNumericOrUnknown("school".to_string()))
    );
    assert_eq!(
        stats::average(&table, "ghost"),
        Err(AnalysisError::NotNumericOrUnknown("ghost".to_string()))
    );
    Ok(())
}
