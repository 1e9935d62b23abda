//! Chart rendering to PNG files via the plotters bitmap backend.
//!
//! Each [`ChartSpec`] becomes one timestamped PNG in the configured output
//! directory. No display is required, so the renderer works headless and in
//! tests.

use chrono::Local;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use plotters::element::Pie;
use plotters::prelude::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};

use crate::chart::{ChartBackend, ChartKind, ChartSpec};
use crate::clean::UNAVAILABLE;
use crate::config::AppConfig;
use crate::table::StudentTable;

/// Pixels per abstract size-hint unit.
const PIXELS_PER_UNIT: f64 = 64.0;

const PALETTE: [RGBColor; 7] = [
    CYAN,
    MAGENTA,
    GREEN,
    YELLOW,
    BLUE,
    RED,
    RGBColor(128, 255, 255),
];

/// The plotters implementation of [`ChartBackend`].
pub struct PngBackend {
    output_dir: PathBuf,
    // disambiguates charts rendered within the same timestamp
    sequence: std::sync::atomic::AtomicU64,
}

impl PngBackend {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            sequence: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.charts.resolved_output_dir())
    }

    fn output_path(&self, kind: ChartKind) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let seq = self
            .sequence
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.output_dir
            .join(format!("{}-{}-{:03}.png", kind.as_str(), stamp, seq))
    }
}

impl ChartBackend for PngBackend {
    fn show(&self, spec: &ChartSpec, table: &StudentTable) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(spec.kind);
        let size = (
            (spec.width * PIXELS_PER_UNIT) as u32,
            (spec.height * PIXELS_PER_UNIT) as u32,
        );

        match spec.kind {
            ChartKind::Box => render_box(&path, size, spec, table)?,
            ChartKind::Scatter => render_scatter(&path, size, spec, table)?,
            ChartKind::Violin => render_violin(&path, size, spec, table)?,
            ChartKind::Pie => render_pie(&path, size, spec, table)?,
        }

        tracing::debug!(chart = spec.kind.as_str(), path = %path.display(), "rendered chart");
        Ok(path)
    }
}

/// (x, y) points with both columns cast to f64 and nulls dropped, the
/// prepare-then-collect pattern.
fn xy_points(table: &StudentTable, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let df = table
        .dataframe()
        .clone()
        .lazy()
        .select([
            col(x).cast(DataType::Float64),
            col(y).cast(DataType::Float64),
        ])
        .drop_nulls(None)
        .collect()?;

    let xs = df.column(x)?.f64()?;
    let ys = df.column(y)?.f64()?;
    let mut points = Vec::with_capacity(df.height());
    for (xv, yv) in xs.into_iter().zip(ys.into_iter()) {
        if let (Some(xv), Some(yv)) = (xv, yv) {
            if xv.is_finite() && yv.is_finite() {
                points.push((xv, yv));
            }
        }
    }
    Ok(points)
}

/// Numeric values of `y` grouped by the textual value of `x`, groups in
/// first-seen row order. Rows with a missing `y` are skipped; a missing
/// `x` groups under the sentinel.
fn category_groups(table: &StudentTable, x: &str, y: &str) -> Result<Vec<(String, Vec<f64>)>> {
    let df = table.dataframe();
    let x_col = df.column(x)?;
    let y_col = df.column(y)?.cast(&DataType::Float64)?;
    let y_ca = y_col.f64()?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for row in 0..df.height() {
        let Some(y_val) = y_ca.get(row) else {
            continue;
        };
        if !y_val.is_finite() {
            continue;
        }
        let key = match x_col.get(row)? {
            AnyValue::Null => UNAVAILABLE.to_string(),
            value => value.str_value().to_string(),
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(y_val),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![y_val]));
            }
        }
    }
    Ok(groups)
}

struct BoxStats {
    min: f64,
    q1: f64,
    median: f64,
    q3: f64,
    max: f64,
}

fn box_stats(values: &[f64]) -> BoxStats {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let at = |q: f64| {
        let idx = (q * (n - 1) as f64).round() as usize;
        sorted[idx.min(n - 1)]
    };
    BoxStats {
        min: sorted[0],
        q1: at(0.25),
        median: at(0.5),
        q3: at(0.75),
        max: sorted[n - 1],
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn render_box(path: &Path, size: (u32, u32), spec: &ChartSpec, table: &StudentTable) -> Result<()> {
    let y_name = spec.y.as_deref().ok_or_else(|| eyre!("box chart needs a y column"))?;
    let groups = category_groups(table, &spec.x, y_name)?;
    if groups.is_empty() {
        return Err(eyre!("No data to plot"));
    }

    let (y_min, y_max) = padded_range(groups.iter().flat_map(|(_, vs)| vs.iter().copied()));
    let categories: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
    let n = categories.len();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title.as_str(), ("sans-serif", 24))
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

    let labels = categories.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&move |v: &f64| {
            let i = v.round();
            if i >= 0.0 && (i as usize) < labels.len() && (v - i).abs() < 0.25 {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    for (i, (_, values)) in groups.iter().enumerate() {
        let stats = box_stats(values);
        let x = i as f64;
        let color = PALETTE[i % PALETTE.len()];
        let half = 0.25;
        let cap = 0.12;

        // whiskers with caps, box, then the median line on top
        chart.draw_series([
            PathElement::new(vec![(x, stats.min), (x, stats.q1)], BLACK),
            PathElement::new(vec![(x, stats.q3), (x, stats.max)], BLACK),
            PathElement::new(vec![(x - cap, stats.min), (x + cap, stats.min)], BLACK),
            PathElement::new(vec![(x - cap, stats.max), (x + cap, stats.max)], BLACK),
        ])?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - half, stats.q1), (x + half, stats.q3)],
            color.mix(0.35).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - half, stats.q1), (x + half, stats.q3)],
            color.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x - half, stats.median), (x + half, stats.median)],
            BLACK.stroke_width(2),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn render_scatter(
    path: &Path,
    size: (u32, u32),
    spec: &ChartSpec,
    table: &StudentTable,
) -> Result<()> {
    let y_name = spec
        .y
        .as_deref()
        .ok_or_else(|| eyre!("scatter chart needs a y column"))?;
    let points = xy_points(table, &spec.x, y_name)?;
    if points.is_empty() {
        return Err(eyre!("No data to plot"));
    }

    let (x_min, x_max) = padded_range(points.iter().map(|&(x, _)| x));
    let (y_min, y_max) = padded_range(points.iter().map(|&(_, y)| y));

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title.as_str(), ("sans-serif", 24))
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    let color = PALETTE[0];
    chart.draw_series(PointSeries::of_element(
        points.into_iter(),
        3,
        color,
        &|c, s, _| EmptyElement::at(c) + Circle::new((0, 0), s, color.filled()),
    ))?;

    root.present()?;
    Ok(())
}

/// Gaussian kernel density over `values` at `at`, Silverman bandwidth.
fn kernel_density(values: &[f64], bandwidth: f64, at: f64) -> f64 {
    let n = values.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    values
        .iter()
        .map(|v| {
            let z = (at - v) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        * norm
}

fn silverman_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = variance.sqrt();
    let bw = 1.06 * std * n.powf(-0.2);
    if bw.is_finite() && bw > 0.0 {
        bw
    } else {
        1.0
    }
}

fn render_violin(
    path: &Path,
    size: (u32, u32),
    spec: &ChartSpec,
    table: &StudentTable,
) -> Result<()> {
    let y_name = spec
        .y
        .as_deref()
        .ok_or_else(|| eyre!("violin chart needs a y column"))?;
    let groups = category_groups(table, &spec.x, y_name)?;
    if groups.is_empty() {
        return Err(eyre!("No data to plot"));
    }

    let (y_min, y_max) = padded_range(groups.iter().flat_map(|(_, vs)| vs.iter().copied()));
    let categories: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
    let n = categories.len();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title.as_str(), ("sans-serif", 24))
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

    let labels = categories.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&move |v: &f64| {
            let i = v.round();
            if i >= 0.0 && (i as usize) < labels.len() && (v - i).abs() < 0.25 {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    const STEPS: usize = 48;
    const MAX_HALF_WIDTH: f64 = 0.4;

    for (i, (_, values)) in groups.iter().enumerate() {
        let x = i as f64;
        let color = PALETTE[i % PALETTE.len()];
        let bw = silverman_bandwidth(values);

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - 2.0 * bw;
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 2.0 * bw;
        let step = (hi - lo) / STEPS as f64;

        let densities: Vec<(f64, f64)> = (0..=STEPS)
            .map(|s| {
                let at = lo + s as f64 * step;
                (at, kernel_density(values, bw, at))
            })
            .collect();
        let peak = densities.iter().map(|&(_, d)| d).fold(0.0f64, f64::max);
        if peak <= 0.0 {
            continue;
        }

        // mirrored silhouette: up the left side, down the right
        let mut polygon: Vec<(f64, f64)> = densities
            .iter()
            .map(|&(at, d)| (x - d / peak * MAX_HALF_WIDTH, at))
            .collect();
        polygon.extend(
            densities
                .iter()
                .rev()
                .map(|&(at, d)| (x + d / peak * MAX_HALF_WIDTH, at)),
        );

        chart.draw_series(std::iter::once(Polygon::new(
            polygon,
            color.mix(0.4).filled(),
        )))?;

        // inner quartile marks, seaborn-style
        let stats = box_stats(values);
        chart.draw_series([
            PathElement::new(vec![(x - 0.1, stats.q1), (x + 0.1, stats.q1)], BLACK),
            PathElement::new(
                vec![(x - 0.15, stats.median), (x + 0.15, stats.median)],
                BLACK.stroke_width(2),
            ),
            PathElement::new(vec![(x - 0.1, stats.q3), (x + 0.1, stats.q3)], BLACK),
        ])?;
    }

    root.present()?;
    Ok(())
}

fn render_pie(path: &Path, size: (u32, u32), spec: &ChartSpec, table: &StudentTable) -> Result<()> {
    let counts = crate::describe::distribution(table, &spec.x)
        .map_err(|e| eyre!("cannot build pie data: {}", e))?;
    if counts.is_empty() {
        return Err(eyre!("No data to plot"));
    }

    let labels: Vec<String> = counts.iter().map(|(value, _)| value.clone()).collect();
    let sizes: Vec<f64> = counts.iter().map(|&(_, count)| count as f64).collect();
    let colors: Vec<RGBColor> = (0..counts.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(spec.title.as_str(), ("sans-serif", 24))?;

    let (w, h) = root.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = (w.min(h) as f64) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(140.0);
    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 12).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}
