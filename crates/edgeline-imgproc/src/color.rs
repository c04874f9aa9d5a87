use edgeline_image::{Raster, BLUE, GREEN, RED};

use crate::error::ImgprocError;
use crate::parallel::ExecutionStrategy;
use crate::threshold::map_pixels;

/// Luma of a BGR pixel, truncated towards zero.
pub fn luma(pixel: &[u8]) -> u8 {
    let (r, g, b) = (pixel[RED] as f64, pixel[GREEN] as f64, pixel[BLUE] as f64);
    (0.299 * r + 0.587 * g + 0.114 * b) as u8
}

/// Convert a BGR(A) raster to grayscale.
///
/// The gray value `0.299 * R + 0.587 * G + 0.114 * B`, truncated, is written
/// to the blue, green and red channels; alpha is carried from the source.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster, RasterSize};
/// use edgeline_imgproc::color::gray_from_bgr;
///
/// let size = RasterSize { width: 1, height: 1 };
/// let src = Raster::new(size, PixelLayout::Bgr8, vec![0, 0, 255]).unwrap();
///
/// let gray = gray_from_bgr(&src).unwrap();
/// assert_eq!(gray.as_slice(), &[76, 76, 76]);
/// ```
pub fn gray_from_bgr(src: &Raster) -> Result<Raster, ImgprocError> {
    gray_from_bgr_with(src, ExecutionStrategy::default())
}

/// Same as [`gray_from_bgr`] with an explicit execution strategy.
pub fn gray_from_bgr_with(
    src: &Raster,
    strategy: ExecutionStrategy,
) -> Result<Raster, ImgprocError> {
    log::debug!("gray_from_bgr: {}", src.size());
    map_pixels(src, strategy, luma)
}
