use edgeline_image::{Raster, RasterSize};

use crate::error::ImgprocError;
use crate::parallel::{self, ExecutionStrategy};

/// Crop a raster to a specified region.
///
/// # Arguments
///
/// * `src` - The source raster to crop.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
/// * `width` - The width of the region.
/// * `height` - The height of the region.
///
/// # Returns
///
/// A packed raster with the layout of `src`, alpha included.
///
/// # Errors
///
/// Fails if the region is empty or leaves the source raster.
///
/// # Examples
///
/// ```rust
/// use edgeline_image::{PixelLayout, Raster, RasterSize};
/// use edgeline_imgproc::crop::crop;
///
/// let data = (0u8..4 * 4 * 3).collect();
/// let image = Raster::new(RasterSize { width: 4, height: 4 }, PixelLayout::Bgr8, data).unwrap();
///
/// let cropped = crop(&image, 1, 1, 2, 2).unwrap();
///
/// assert_eq!(cropped.pixel(0, 0), image.pixel(1, 1));
/// assert_eq!(cropped.pixel(1, 1), image.pixel(2, 2));
/// ```
pub fn crop(
    src: &Raster,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<Raster, ImgprocError> {
    let fits = |start: usize, len: usize, bound: usize| {
        start.checked_add(len).is_some_and(|end| end <= bound)
    };
    if width == 0 || height == 0 || !fits(x, width, src.width()) || !fits(y, height, src.height())
    {
        return Err(ImgprocError::InvalidParameter(format!(
            "crop region {width}x{height} at ({x}, {y}) leaves raster {}",
            src.size()
        )));
    }

    let channels = src.num_channels();
    let size = RasterSize { width, height };
    let mut dst = Raster::from_size_val(size, src.layout(), 0)?;

    parallel::for_each_row(ExecutionStrategy::default(), &mut dst, |i, dst_row| {
        // get the slice at the top left corner
        if let Some(src_row) = src.row(y + i) {
            dst_row.copy_from_slice(&src_row[x * channels..(x + width) * channels]);
        }
    })?;

    Ok(dst)
}
