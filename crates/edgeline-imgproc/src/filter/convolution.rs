use edgeline_image::{Raster, BLUE, GREEN, RED};

use super::{clamp_response, Kernel};
use crate::error::ImgprocError;
use crate::parallel::{self, ExecutionStrategy};

/// Check that the kernel fits inside the raster and the scale is usable.
pub(crate) fn check_kernel_fits(
    src: &Raster,
    kernel: &Kernel,
    scale: f64,
) -> Result<(), ImgprocError> {
    if src.width() < kernel.side() || src.height() < kernel.side() {
        return Err(ImgprocError::InvalidParameter(format!(
            "raster {} is smaller than the {}x{} kernel",
            src.size(),
            kernel.side(),
            kernel.side()
        )));
    }

    if !scale.is_finite() {
        return Err(ImgprocError::InvalidParameter(format!(
            "kernel scale must be finite, got {scale}"
        )));
    }

    Ok(())
}

/// Convolve a raster with a square kernel.
///
/// The blue, green and red channels of every pixel at least `kernel.border()` pixels away from
/// each edge becomes `scale * sum(kernel[i, j] * src[y + i, x + j])`, clamped
/// so that values above 255 saturate and values below 1 become 0. Pixels
/// closer to an edge are copied unchanged from the source. Alpha is always
/// copied from the source.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `kernel` - The convolution kernel.
/// * `scale` - The normalization scale, e.g. `1/16` for the 3x3 Gaussian.
///
/// # Returns
///
/// A new raster with the same size, layout and stride as `src`.
///
/// # Errors
///
/// Fails with [`ImgprocError::InvalidParameter`] if the raster is smaller than
/// the kernel or the scale is not finite.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster};
/// use edgeline_imgproc::filter::{convolve, KernelKind};
///
/// let src = Raster::from_size_val([5, 5].into(), PixelLayout::Bgr8, 90).unwrap();
/// let (kernel, scale) = KernelKind::Gaussian3x3.with_scale();
///
/// let dst = convolve(&src, &kernel, scale).unwrap();
/// assert_eq!(dst.get(2, 2, 0), Some(90));
/// ```
pub fn convolve(src: &Raster, kernel: &Kernel, scale: f64) -> Result<Raster, ImgprocError> {
    convolve_with(src, kernel, scale, ExecutionStrategy::default())
}

/// Same as [`convolve`] with an explicit execution strategy.
pub fn convolve_with(
    src: &Raster,
    kernel: &Kernel,
    scale: f64,
    strategy: ExecutionStrategy,
) -> Result<Raster, ImgprocError> {
    check_kernel_fits(src, kernel, scale)?;

    log::debug!(
        "convolve: {} with {}x{} kernel, scale {}",
        src.size(),
        kernel.side(),
        kernel.side(),
        scale
    );

    let border = kernel.border();
    let (width, height) = (src.width(), src.height());
    let channels = src.num_channels();
    let side = kernel.side();
    let coefficients = kernel.as_slice();

    // border pixels keep the source bytes
    let mut dst = src.clone();

    parallel::for_each_row(strategy, &mut dst, |y, dst_row| {
        if y < border || y + border >= height {
            return;
        }

        let window = (y - border..=y + border)
            .filter_map(|r| src.row(r))
            .collect::<Vec<_>>();

        for x in border..width - border {
            for ch in [BLUE, GREEN, RED] {
                let mut sum = 0.0;
                for (i, src_row) in window.iter().enumerate() {
                    let taps = &coefficients[i * side..(i + 1) * side];
                    for (j, &k) in taps.iter().enumerate() {
                        sum += k * src_row[(x + j - border) * channels + ch] as f64;
                    }
                }
                dst_row[x * channels + ch] = clamp_response(scale * sum);
            }
        }
    })?;

    Ok(dst)
}
