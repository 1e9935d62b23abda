//! Chart specifications: renderer-agnostic descriptions of one chart each,
//! built from validated column selections.

use color_eyre::Result;
use std::path::PathBuf;

use crate::error::AnalysisError;
use crate::table::StudentTable;

/// The fixed set of chart kinds this tool draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Box,
    Scatter,
    Violin,
    Pie,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Scatter => "scatter",
            Self::Violin => "violin",
            Self::Pie => "pie",
        }
    }
}

/// A fully-specified chart: kind, validated column names, captions, and a
/// size hint in abstract units (the backend maps units to pixels).
/// Produced by the constructors below, consumed once by a [`ChartBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x: String,
    /// Absent for single-column charts (pie).
    pub y: Option<String>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: f64,
    pub height: f64,
}

pub const DEFAULT_FIGURE_SIZE: (f64, f64) = (10.0, 6.0);
const PIE_FIGURE_SIZE: (f64, f64) = (8.0, 8.0);

impl ChartSpec {
    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn new(kind: ChartKind, x: &str, y: Option<&str>, title: &str) -> Self {
        let (width, height) = match kind {
            ChartKind::Pie => PIE_FIGURE_SIZE,
            _ => DEFAULT_FIGURE_SIZE,
        };
        Self {
            kind,
            x: x.to_string(),
            y: y.map(str::to_string),
            title: title.to_string(),
            x_label: String::new(),
            y_label: String::new(),
            width,
            height,
        }
    }
}

/// The seam between spec production and rendering. `show` blocks until the
/// chart has been written and returns the output path.
pub trait ChartBackend {
    fn show(&self, spec: &ChartSpec, table: &StudentTable) -> Result<PathBuf>;
}

/// A box chart of `y` grouped by `x`. Both columns must exist.
pub fn box_chart(
    table: &StudentTable,
    x: &str,
    y: &str,
    title: &str,
) -> Result<ChartSpec, AnalysisError> {
    table.require_column(x)?;
    table.require_column(y)?;
    Ok(ChartSpec::new(ChartKind::Box, x, Some(y), title))
}

/// A scatter chart of `y` against `x`. Both columns must exist.
pub fn scatter_chart(
    table: &StudentTable,
    x: &str,
    y: &str,
    title: &str,
) -> Result<ChartSpec, AnalysisError> {
    table.require_column(x)?;
    table.require_column(y)?;
    Ok(ChartSpec::new(ChartKind::Scatter, x, Some(y), title))
}

/// A violin chart of `y` grouped by `x`. Both columns must exist.
pub fn violin_chart(
    table: &StudentTable,
    x: &str,
    y: &str,
    title: &str,
) -> Result<ChartSpec, AnalysisError> {
    table.require_column(x)?;
    table.require_column(y)?;
    Ok(ChartSpec::new(ChartKind::Violin, x, Some(y), title))
}

/// A pie chart of the value counts of one column, which must exist.
pub fn pie_chart(
    table: &StudentTable,
    column: &str,
    title: &str,
) -> Result<ChartSpec, AnalysisError> {
    table.require_column(column)?;
    Ok(ChartSpec::new(ChartKind::Pie, column, None, title))
}

/// The deterministic chart demonstration: a box chart of the first
/// categorical against the first numeric column, a scatter of the first
/// two numeric columns when a second exists, and a violin of the first
/// categorical against the first numeric. A table without at least one
/// column of each kind yields `InsufficientColumnDiversity` and no partial
/// charts.
pub fn showcase(table: &StudentTable) -> Result<Vec<ChartSpec>, AnalysisError> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();

    let (Some(first_num), Some(first_cat)) = (numeric.first(), categorical.first()) else {
        return Err(AnalysisError::InsufficientColumnDiversity);
    };

    let mut specs = vec![box_chart(
        table,
        first_cat.name(),
        first_num.name(),
        &format!("A Box Plot of {} vs {}", first_cat.name(), first_num.name()),
    )?];

    if let Some(second_num) = numeric.get(1) {
        specs.push(scatter_chart(
            table,
            first_num.name(),
            second_num.name(),
            &format!(
                "A Scatter Plot of {} vs {}",
                first_num.name(),
                second_num.name()
            ),
        )?);
    }

    specs.push(
        violin_chart(
            table,
            first_cat.name(),
            first_num.name(),
            &format!(
                "A Violin Plot: {} vs {}",
                first_cat.name(),
                first_num.name()
            ),
        )?
        .with_labels(first_cat.name(), first_num.name()),
    );

    Ok(specs)
}
