//! The guided tour: five preset box charts relating a chosen term grade to
//! parental education, study time, gender, and school.

use crate::chart::{self, ChartSpec};
use crate::error::AnalysisError;
use crate::table::StudentTable;

/// The valid term selectors. Anything else is re-prompted, never accepted.
pub const TERMS: [&str; 3] = ["1", "2", "3"];

/// Maps a term selector to its grade column.
pub fn grade_column_for_term(term: &str) -> Option<String> {
    if TERMS.contains(&term) {
        Some(format!("G{}", term))
    } else {
        None
    }
}

/// Builds the five fixed box-chart specs for one term. Fails fast with
/// `MissingTargetColumn` before building anything when the mapped grade
/// column is absent; there is no partial tour.
pub fn specs_for_term(table: &StudentTable, term: &str) -> Result<Vec<ChartSpec>, AnalysisError> {
    let target = grade_column_for_term(term)
        .ok_or_else(|| AnalysisError::InvalidCommand(term.to_string()))?;
    if table.kind_of(&target).is_none() {
        return Err(AnalysisError::MissingTargetColumn(target));
    }

    Ok(vec![
        chart::box_chart(
            table,
            "Medu",
            &target,
            &format!("EFFECT OF MOTHER'S EDUCATION ON {}", target),
        )?
        .with_labels("Mother's Educational Level", &target),
        chart::box_chart(
            table,
            "Fedu",
            &target,
            &format!("EFFECT OF FATHER'S EDUCATION ON {}", target),
        )?
        .with_labels("Father's Educational Level", &target),
        chart::box_chart(
            table,
            "studytime",
            &target,
            &format!("RELATIONSHIP BETWEEN STUDY TIME AND {}", target),
        )?
        .with_labels("Study Time", &target),
        chart::box_chart(
            table,
            "sex",
            &target,
            &format!("COMPARISON OF {} BY GENDER", target),
        )?
        .with_labels("Gender", &target),
        chart::box_chart(table, "school", &target, "IMPACT OF SCHOOL ON STUDENT PERFORMANCE")?
            .with_labels("School", &target),
    ])
}
