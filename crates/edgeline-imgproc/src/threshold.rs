use edgeline_image::{Raster, ALPHA, BLUE, GREEN, RED};

use crate::error::ImgprocError;
use crate::parallel::{self, ExecutionStrategy};

/// Luma cutoff used by [`binary_from_bgr`] when none is configured.
pub const DEFAULT_BINARY_THRESHOLD: f64 = 115.0;

/// Edge strength after double thresholding, stored as raw pixel intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EdgeClass {
    /// Not an edge.
    None = 0,
    /// Candidate edge, kept only when linked to a strong edge.
    Weak = 127,
    /// Certain edge.
    Strong = 255,
}

impl EdgeClass {
    /// The intensity written to every color channel.
    pub const fn intensity(self) -> u8 {
        self as u8
    }

    /// Parse a stored intensity; any other value returns `None`.
    pub fn from_intensity(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            127 => Some(Self::Weak),
            255 => Some(Self::Strong),
            _ => None,
        }
    }

    /// Classify a first-channel value against two fractions of 255.
    pub fn classify(value: u8, low: f64, high: f64) -> Self {
        let value = value as f64;
        if value > high * 255.0 {
            Self::Strong
        } else if value < low * 255.0 {
            Self::None
        } else {
            Self::Weak
        }
    }
}

fn check_fractions(low: f64, high: f64) -> Result<(), ImgprocError> {
    if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
        return Err(ImgprocError::InvalidParameter(format!(
            "threshold fractions must lie in [0, 1], got low {low} and high {high}"
        )));
    }
    if low >= high {
        return Err(ImgprocError::InvalidParameter(format!(
            "low threshold {low} must be below high threshold {high}"
        )));
    }
    Ok(())
}

/// Classify every pixel into none, weak or strong edge.
///
/// Only the first channel is read. The class intensity (0, 127 or 255) is
/// written to the blue, green and red channels; alpha is carried from the
/// source. Every pixel is classified, border included.
///
/// # Arguments
///
/// * `src` - The source raster, usually the output of non-maximum suppression.
/// * `low` - Fraction of 255 below which a pixel is not an edge.
/// * `high` - Fraction of 255 above which a pixel is a strong edge.
///
/// # Errors
///
/// Fails if either fraction is outside `[0, 1]` or `low >= high`.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster};
/// use edgeline_imgproc::threshold::double_threshold;
///
/// let src = Raster::from_size_val([2, 2].into(), PixelLayout::Bgr8, 100).unwrap();
/// let dst = double_threshold(&src, 0.3, 0.7).unwrap();
///
/// assert_eq!(dst.pixel(1, 1), Some(&[127u8, 127, 127][..]));
/// ```
pub fn double_threshold(src: &Raster, low: f64, high: f64) -> Result<Raster, ImgprocError> {
    double_threshold_with(src, low, high, ExecutionStrategy::default())
}

/// Same as [`double_threshold`] with an explicit execution strategy.
pub fn double_threshold_with(
    src: &Raster,
    low: f64,
    high: f64,
    strategy: ExecutionStrategy,
) -> Result<Raster, ImgprocError> {
    check_fractions(low, high)?;

    log::debug!("double_threshold: {} low {low} high {high}", src.size());

    map_pixels(src, strategy, |pixel| {
        EdgeClass::classify(pixel[BLUE], low, high).intensity()
    })
}

/// Binarize a color raster by weighted luma.
///
/// A pixel becomes 0 when `0.3 * R + 1.0 * G + 0.11 * B < threshold` and 255
/// otherwise, replicated to the blue, green and red channels. The result can
/// be fed straight into the Hough accumulator.
///
/// # Errors
///
/// Fails if the threshold is not finite.
pub fn binary_from_bgr(src: &Raster, threshold: f64) -> Result<Raster, ImgprocError> {
    if !threshold.is_finite() {
        return Err(ImgprocError::InvalidParameter(format!(
            "binary threshold must be finite, got {threshold}"
        )));
    }

    log::debug!("binary_from_bgr: {} threshold {threshold}", src.size());

    map_pixels(src, ExecutionStrategy::default(), |pixel| {
        let luma = 0.3 * pixel[RED] as f64 + pixel[GREEN] as f64 + 0.11 * pixel[BLUE] as f64;
        if luma < threshold {
            0
        } else {
            255
        }
    })
}

/// Write `f(pixel)` to the color channels of every pixel, carrying alpha.
pub(crate) fn map_pixels<F>(
    src: &Raster,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<Raster, ImgprocError>
where
    F: Fn(&[u8]) -> u8 + Send + Sync,
{
    let channels = src.num_channels();
    let has_alpha = src.has_alpha();
    let mut dst = src.zeros_like();

    parallel::for_each_row(strategy, &mut dst, |y, dst_row| {
        let Some(src_row) = src.row(y) else {
            return;
        };
        dst_row
            .chunks_exact_mut(channels)
            .zip(src_row.chunks_exact(channels))
            .for_each(|(dst_pixel, src_pixel)| {
                let v = f(src_pixel);
                dst_pixel[..3].fill(v);
                if has_alpha {
                    dst_pixel[ALPHA] = src_pixel[ALPHA];
                }
            });
    })?;

    Ok(dst)
}
