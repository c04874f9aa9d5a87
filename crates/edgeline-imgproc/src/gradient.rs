use std::sync::atomic::{AtomicUsize, Ordering};

use edgeline_image::{Raster, RasterSize, ALPHA, BLUE, GREEN, RED};

use crate::error::ImgprocError;
use crate::filter::{self, Kernel, KernelKind};
use crate::parallel::{self, ExecutionStrategy};

/// Direction stored when the red horizontal response is exactly zero.
///
/// The ratio `vertical / horizontal` is undefined there; the sentinel keeps
/// the field inside `(-90, 90]` instead of propagating an infinity or a NaN.
/// Negative and zero vertical responses get it too, so such pixels land in
/// the vertical-neighbour suppression bin rather than being discarded as a
/// plain `atan(v / 0)` would do.
pub const ZERO_RESPONSE_DIRECTION: f64 = 90.0;

/// Per-pixel gradient direction in degrees, in `(-90, 90]`.
///
/// Pixels the gradient never visits (the border ring) hold `0.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionField {
    size: RasterSize,
    data: Vec<f64>,
}

impl DirectionField {
    /// Create a field of zeros.
    pub fn new(size: RasterSize) -> Self {
        Self {
            size,
            data: vec![0.0; size.width * size.height],
        }
    }

    /// Create a field from row-major angles.
    ///
    /// # Errors
    ///
    /// Fails if `data.len() != width * height`.
    pub fn from_vec(size: RasterSize, data: Vec<f64>) -> Result<Self, ImgprocError> {
        if data.len() != size.width * size.height {
            return Err(ImgprocError::InvalidParameter(format!(
                "direction field of {size} needs {} values, got {}",
                size.width * size.height,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Size of the field in pixels.
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Angle at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get(y * self.size.width + x).copied()
    }

    /// Row-major angles.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Gradient magnitude raster and direction field.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientField {
    /// Per-channel magnitude; the border ring is zero.
    pub magnitude: Raster,
    /// Direction computed from the red channel.
    pub direction: DirectionField,
}

impl GradientField {
    /// Split into the magnitude raster and the direction field.
    pub fn into_parts(self) -> (Raster, DirectionField) {
        (self.magnitude, self.direction)
    }
}

/// Direction in degrees from the red channel responses.
///
/// This is `atan`, not `atan2`: the result lies in `(-90, 90]` and a zero
/// horizontal response maps to [`ZERO_RESPONSE_DIRECTION`].
pub fn direction_degrees(vertical: f64, horizontal: f64) -> f64 {
    if horizontal == 0.0 {
        return ZERO_RESPONSE_DIRECTION;
    }
    (vertical / horizontal).atan().to_degrees()
}

/// Compute the gradient magnitude and direction with a pair of kernels.
///
/// For every interior pixel both kernels are applied to the blue, green and
/// red channels. Each channel's magnitude is `scale * sqrt(h^2 + v^2)` clamped
/// like [`crate::filter::convolve`]. The direction is computed once per pixel
/// from the red channel only, see [`direction_degrees`].
///
/// The magnitude raster is freshly allocated and its border ring stays zero;
/// the alpha channel of a BGRA raster is copied from the source.
///
/// # Arguments
///
/// * `src` - The source raster, usually a smoothed grayscale raster.
/// * `vertical` - Kernel whose response is the numerator of the direction ratio.
/// * `horizontal` - Kernel whose response is the denominator of the direction ratio.
/// * `scale` - Scale applied to the magnitude.
///
/// # Errors
///
/// Fails if the kernels differ in size, if the raster is smaller than the
/// kernels or if the scale is not finite.
pub fn gradient(
    src: &Raster,
    vertical: &Kernel,
    horizontal: &Kernel,
    scale: f64,
) -> Result<GradientField, ImgprocError> {
    gradient_with(src, vertical, horizontal, scale, ExecutionStrategy::default())
}

/// Compute the Sobel gradient with unit scale.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster};
/// use edgeline_imgproc::gradient::sobel;
///
/// let src = Raster::from_size_val([6, 6].into(), PixelLayout::Bgr8, 40).unwrap();
/// let field = sobel(&src).unwrap();
///
/// assert_eq!(field.magnitude.get(3, 3, 0), Some(0));
/// ```
pub fn sobel(src: &Raster) -> Result<GradientField, ImgprocError> {
    gradient(
        src,
        &KernelKind::SobelVertical.kernel(),
        &KernelKind::SobelHorizontal.kernel(),
        1.0,
    )
}

/// Same as [`gradient`] with an explicit execution strategy.
pub fn gradient_with(
    src: &Raster,
    vertical: &Kernel,
    horizontal: &Kernel,
    scale: f64,
    strategy: ExecutionStrategy,
) -> Result<GradientField, ImgprocError> {
    if vertical.side() != horizontal.side() {
        return Err(ImgprocError::InvalidParameter(format!(
            "gradient kernels must have the same size, got {} and {}",
            vertical.side(),
            horizontal.side()
        )));
    }
    filter::check_kernel_fits(src, vertical, scale)?;

    log::debug!(
        "gradient: {} with {}x{} kernels, scale {}",
        src.size(),
        vertical.side(),
        vertical.side(),
        scale
    );

    let border = vertical.border();
    let side = vertical.side();
    let (width, height) = (src.width(), src.height());
    let channels = src.num_channels();
    let has_alpha = src.has_alpha();
    let (v_taps, h_taps) = (vertical.as_slice(), horizontal.as_slice());

    let mut magnitude = src.zeros_like();
    let mut angles = vec![0.0; width * height];
    let zero_responses = AtomicUsize::new(0);

    parallel::for_each_row_with_aux(
        strategy,
        &mut magnitude,
        &mut angles,
        |y, dst_row, angle_row| {
            if has_alpha {
                if let Some(src_row) = src.row(y) {
                    for x in 0..width {
                        dst_row[x * channels + ALPHA] = src_row[x * channels + ALPHA];
                    }
                }
            }

            if y < border || y + border >= height {
                return;
            }

            let window = (y - border..=y + border)
                .filter_map(|r| src.row(r))
                .collect::<Vec<_>>();

            for x in border..width - border {
                let mut h = [0.0f64; 3];
                let mut v = [0.0f64; 3];
                for (i, src_row) in window.iter().enumerate() {
                    for j in 0..side {
                        let (kh, kv) = (h_taps[i * side + j], v_taps[i * side + j]);
                        let pixel = (x + j - border) * channels;
                        for ch in [BLUE, GREEN, RED] {
                            let value = src_row[pixel + ch] as f64;
                            h[ch] += value * kh;
                            v[ch] += value * kv;
                        }
                    }
                }

                if h[RED] == 0.0 {
                    zero_responses.fetch_add(1, Ordering::Relaxed);
                }
                angle_row[x] = direction_degrees(v[RED], h[RED]);

                for ch in [BLUE, GREEN, RED] {
                    let m = scale * (h[ch] * h[ch] + v[ch] * v[ch]).sqrt();
                    dst_row[x * channels + ch] = filter::clamp_response(m);
                }
            }
        },
    )?;

    log::trace!(
        "gradient: {} pixels with zero horizontal response",
        zero_responses.load(Ordering::Relaxed)
    );

    Ok(GradientField {
        magnitude,
        direction: DirectionField {
            size: src.size(),
            data: angles,
        },
    })
}
