use edgeline_image::{Raster, BLUE};

use crate::error::ImgprocError;
use crate::threshold::EdgeClass;

fn fill_bgr(raster: &mut Raster, x: usize, y: usize, value: u8) {
    if let Some(pixel) = raster.pixel_mut(x, y) {
        pixel[..3].fill(value);
    }
}

/// Link weak edges and drop isolated ones, in place.
///
/// Expects the output of [`crate::threshold::double_threshold`]. The interior
/// is swept once in row-major order:
///
/// - a pixel whose first channel is 0 scans its 3x3 neighbourhood row by row,
///   left to right. Each neighbour that is neither 0 nor 255 and not on the
///   outer ring is zeroed; the first neighbour that is 0, 255 or on the ring
///   ends the scan of that neighbourhood row.
/// - any other pixel is promoted to 255.
///
/// Mutations are visible to the rest of the sweep, so the order is part of
/// the result and the pass is strictly sequential. The outer ring is then
/// normalized: strong pixels stay 255 and everything else becomes 0. Only the
/// blue, green and red channels are written.
///
/// # Errors
///
/// Fails if the raster has no interior, i.e. it is narrower or shorter than
/// 3 pixels.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster};
/// use edgeline_imgproc::hysteresis::hysteresis;
///
/// let mut edges = Raster::from_size_val([3, 3].into(), PixelLayout::Bgr8, 0).unwrap();
/// edges.set_bgr(1, 1, [127, 127, 127]).unwrap();
/// hysteresis(&mut edges).unwrap();
///
/// assert_eq!(edges.get(1, 1, 0), Some(255));
/// ```
pub fn hysteresis(raster: &mut Raster) -> Result<(), ImgprocError> {
    let (width, height) = (raster.width(), raster.height());
    if width < 3 || height < 3 {
        return Err(ImgprocError::InvalidParameter(format!(
            "hysteresis needs at least 3x3 pixels, got {}",
            raster.size()
        )));
    }

    log::debug!("hysteresis: {}", raster.size());

    let none = EdgeClass::None.intensity();
    let strong = EdgeClass::Strong.intensity();
    let on_ring = |x: usize, y: usize| x == 0 || y == 0 || x + 1 >= width || y + 1 >= height;

    let mut discarded = 0usize;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if raster.get(x, y, BLUE) != Some(none) {
                fill_bgr(raster, x, y, strong);
                continue;
            }

            fill_bgr(raster, x, y, none);
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    let Some(value) = raster.get(nx, ny, BLUE) else {
                        break;
                    };
                    if value == none || value == strong || on_ring(nx, ny) {
                        break;
                    }
                    fill_bgr(raster, nx, ny, none);
                    discarded += 1;
                }
            }
        }
    }

    for y in 0..height {
        for x in 0..width {
            if on_ring(x, y) {
                let value = match raster.get(x, y, BLUE) {
                    Some(v) if v == strong => strong,
                    _ => none,
                };
                fill_bgr(raster, x, y, value);
            }
        }
    }

    log::trace!("hysteresis: {discarded} weak pixels discarded");

    Ok(())
}
