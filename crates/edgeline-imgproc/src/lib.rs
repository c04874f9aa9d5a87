#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color conversion module.
pub mod color;

/// raster cropping module.
pub mod crop;

/// error types for the processing stages.
pub mod error;

/// kernel catalog and convolution module.
pub mod filter;

/// gradient magnitude and direction module.
pub mod gradient;

/// Hough transform accumulator module.
pub mod hough;

/// hysteresis edge linking module.
pub mod hysteresis;

/// line reconstruction and rendering module.
pub mod lines;

/// order-statistic filtering module.
pub mod median;

/// non-maximum suppression module.
pub mod nms;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold rasters.
pub mod threshold;

pub use crate::error::ImgprocError;
