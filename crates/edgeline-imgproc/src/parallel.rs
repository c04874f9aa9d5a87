use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgeline_image::Raster;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The auxiliary buffer does not have one chunk per raster row.
    #[error("auxiliary buffer of length {0} does not match {1} rows")]
    SizeMismatch(usize, usize),
}

/// Controls how the per-row stages are executed.
///
/// Every strategy produces byte-identical output; rows are written disjointly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small rasters, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

fn fixed_pool(n: usize) -> Result<rayon::ThreadPool, ParallelError> {
    if n == 0 {
        return Err(ParallelError::InvalidThreadCount(n));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))
}

/// Apply a function to every row of the raster.
///
/// The closure receives the row index and the packed pixel bytes of that row
/// (row padding excluded).
pub fn for_each_row<F>(
    strategy: ExecutionStrategy,
    dst: &mut Raster,
    f: F,
) -> Result<(), ParallelError>
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    let stride = dst.stride();
    let packed = dst.width() * dst.num_channels();
    let data = dst.as_slice_mut();

    let op = |(y, row): (usize, &mut [u8])| f(y, &mut row[..packed]);

    match strategy {
        ExecutionStrategy::Serial => data.chunks_exact_mut(stride).enumerate().for_each(op),
        ExecutionStrategy::ParallelRows => {
            data.par_chunks_exact_mut(stride).enumerate().for_each(op)
        }
        ExecutionStrategy::Fixed(n) => fixed_pool(n)?
            .install(|| data.par_chunks_exact_mut(stride).enumerate().for_each(op)),
    }

    Ok(())
}

/// Apply a function to every row of the raster together with the matching row
/// of an auxiliary per-pixel buffer holding `width` values per row.
pub fn for_each_row_with_aux<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut Raster,
    aux: &mut [T],
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [u8], &mut [T]) + Send + Sync,
{
    let width = dst.width();
    if aux.len() != width * dst.height() {
        return Err(ParallelError::SizeMismatch(aux.len(), dst.height()));
    }

    let stride = dst.stride();
    let packed = width * dst.num_channels();
    let data = dst.as_slice_mut();

    let op = |(y, (row, aux_row)): (usize, (&mut [u8], &mut [T]))| {
        f(y, &mut row[..packed], aux_row)
    };

    match strategy {
        ExecutionStrategy::Serial => data
            .chunks_exact_mut(stride)
            .zip(aux.chunks_exact_mut(width))
            .enumerate()
            .for_each(op),
        ExecutionStrategy::ParallelRows => data
            .par_chunks_exact_mut(stride)
            .zip(aux.par_chunks_exact_mut(width))
            .enumerate()
            .for_each(op),
        ExecutionStrategy::Fixed(n) => fixed_pool(n)?.install(|| {
            data.par_chunks_exact_mut(stride)
                .zip(aux.par_chunks_exact_mut(width))
                .enumerate()
                .for_each(op)
        }),
    }

    Ok(())
}
