#![deny(missing_docs)]
//! Raster types for the edge and line detection stages.

/// strided raster representation.
pub mod raster;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::raster::{PixelLayout, Raster, RasterSize, ALPHA, BLUE, GREEN, RED};
