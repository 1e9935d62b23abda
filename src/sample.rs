//! Uniform random row sampling. Indices are drawn from the table's actual
//! current height, never a fixed bound.

use color_eyre::Result;
use polars::prelude::*;
use rand::Rng;

use crate::error::AnalysisError;
use crate::table::StudentTable;

/// Draws `k` distinct row positions uniformly without replacement from
/// `[0, height)`, returned in ascending order.
pub fn sample_indices<R: Rng + ?Sized>(
    height: usize,
    k: usize,
    rng: &mut R,
) -> Result<Vec<u32>, AnalysisError> {
    if k > height {
        return Err(AnalysisError::InsufficientRows {
            requested: k,
            available: height,
        });
    }
    let mut indices: Vec<u32> = rand::seq::index::sample(rng, height, k)
        .into_iter()
        .map(|i| i as u32)
        .collect();
    indices.sort_unstable();
    Ok(indices)
}

/// A random subset of `k` rows in ascending row order, using the thread
/// rng.
pub fn sample(table: &StudentTable, k: usize) -> Result<DataFrame> {
    sample_with(table, k, &mut rand::thread_rng())
}

/// Like [`sample`], with the rng supplied by the caller so tests can be
/// deterministic.
pub fn sample_with<R: Rng + ?Sized>(
    table: &StudentTable,
    k: usize,
    rng: &mut R,
) -> Result<DataFrame> {
    let indices = sample_indices(table.height(), k, rng)?;
    let indices = UInt32Chunked::from_vec("sample".into(), indices);
    Ok(table.dataframe().take(&indices)?)
}
