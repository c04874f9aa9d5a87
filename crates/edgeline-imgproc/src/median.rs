use edgeline_image::Raster;

use crate::error::ImgprocError;
use crate::parallel::{self, ExecutionStrategy};

/// Pack the channels of a pixel into one integer, first channel lowest.
fn pack(pixel: &[u8]) -> u32 {
    pixel
        .iter()
        .rev()
        .fold(0u32, |acc, &v| (acc << 8) | v as u32)
}

fn unpack(value: u32, pixel: &mut [u8]) {
    for (i, v) in pixel.iter_mut().enumerate() {
        *v = (value >> (8 * i)) as u8;
    }
}

/// Replace each interior pixel by the median of its window over whole pixels.
///
/// Every pixel in the `window x window` neighbourhood is packed into a single
/// integer (blue in the lowest byte, alpha in the highest) and the packed
/// values are sorted. The value at rank `len / 2` is unpacked into all
/// channels of the output pixel, so the channels always come from the same
/// source pixel. This differs from a per-channel median.
///
/// Pixels within `window / 2` of an edge are copied from the source.
///
/// # Errors
///
/// Fails if the window is even or zero, or larger than the raster.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster};
/// use edgeline_imgproc::median::median_filter;
///
/// let mut src = Raster::from_size_val([3, 3].into(), PixelLayout::Bgr8, 60).unwrap();
/// src.set_bgr(1, 1, [255, 0, 255]).unwrap();
///
/// let dst = median_filter(&src, 3).unwrap();
/// assert_eq!(dst.pixel(1, 1), Some(&[60u8, 60, 60][..]));
/// ```
pub fn median_filter(src: &Raster, window: usize) -> Result<Raster, ImgprocError> {
    median_filter_with(src, window, ExecutionStrategy::default())
}

/// Same as [`median_filter`] with an explicit execution strategy.
pub fn median_filter_with(
    src: &Raster,
    window: usize,
    strategy: ExecutionStrategy,
) -> Result<Raster, ImgprocError> {
    if window == 0 || window % 2 == 0 {
        return Err(ImgprocError::InvalidParameter(format!(
            "median window must be odd and positive, got {window}"
        )));
    }
    if src.width() < window || src.height() < window {
        return Err(ImgprocError::InvalidParameter(format!(
            "raster {} is smaller than the {window}x{window} window",
            src.size()
        )));
    }

    log::debug!("median_filter: {} window {window}", src.size());

    let border = window / 2;
    let (width, height) = (src.width(), src.height());
    let channels = src.num_channels();

    let mut dst = src.clone();

    parallel::for_each_row(strategy, &mut dst, |y, dst_row| {
        if y < border || y + border >= height {
            return;
        }

        let rows = (y - border..=y + border)
            .filter_map(|r| src.row(r))
            .collect::<Vec<_>>();
        let mut neighbours = Vec::with_capacity(window * window);

        for x in border..width - border {
            neighbours.clear();
            for row in &rows {
                let start = (x - border) * channels;
                neighbours.extend(
                    row[start..start + window * channels]
                        .chunks_exact(channels)
                        .map(pack),
                );
            }
            neighbours.sort_unstable();

            let median = neighbours[neighbours.len() / 2];
            unpack(median, &mut dst_row[x * channels..(x + 1) * channels]);
        }
    })?;

    Ok(dst)
}
