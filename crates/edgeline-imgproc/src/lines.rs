use edgeline_image::Raster;

use crate::error::ImgprocError;
use crate::hough::{sin_cos_table, DetectedLine, HoughAccumulator};

/// Color of rendered lines, in BGR order.
pub const LINE_MARKER_COLOR: [u8; 3] = [0, 0, 255];

/// Angle buckets whose cosine magnitude is below this are not rendered.
pub const MIN_ABS_COS: f64 = 1e-9;

/// Draw every line with more than `level` votes, in place.
///
/// For each detected line and each row `y` the column is
/// `x = trunc(d / cos t - y * sin t / cos t)` with `d` the signed distance;
/// pixels with `0 <= x < width` are set to [`LINE_MARKER_COLOR`]. Lines at
/// +-90 degrees have no such column per row and are skipped.
///
/// Returns the number of lines drawn.
pub fn render_lines(
    dst: &mut Raster,
    accumulator: &HoughAccumulator,
    level: u8,
) -> Result<usize, ImgprocError> {
    render_lines_within(dst, accumulator, level, None)
}

/// Same as [`render_lines`], restricted to lines with `|angle| < max_abs_angle`
/// degrees when a window is given.
///
/// # Errors
///
/// Fails if the window is NaN.
///
/// # Examples
///
/// ```
/// use edgeline_image::{PixelLayout, Raster};
/// use edgeline_imgproc::hough::HoughAccumulator;
/// use edgeline_imgproc::lines::{render_lines_within, LINE_MARKER_COLOR};
///
/// let mut edges = Raster::from_size_val([64, 64].into(), PixelLayout::Bgr8, 0).unwrap();
/// for y in 0..64 {
///     edges.set_bgr(20, y, [255, 255, 255]).unwrap();
/// }
/// let acc = HoughAccumulator::build(&edges, 1).unwrap();
///
/// let mut canvas = Raster::from_size_val([64, 64].into(), PixelLayout::Bgr8, 0).unwrap();
/// render_lines_within(&mut canvas, &acc, 62, Some(5.0)).unwrap();
/// assert_eq!(canvas.pixel(20, 10), Some(&LINE_MARKER_COLOR[..]));
/// ```
pub fn render_lines_within(
    dst: &mut Raster,
    accumulator: &HoughAccumulator,
    level: u8,
    max_abs_angle: Option<f64>,
) -> Result<usize, ImgprocError> {
    let lines = select_lines(accumulator, level, max_abs_angle)?;
    draw_lines(dst, &lines, accumulator.half_range())
}

/// Lines with more than `level` votes, restricted to `|angle| < max_abs_angle`
/// degrees when a window is given.
///
/// Lines at +-90 degrees are listed even though [`draw_lines`] skips them.
///
/// # Errors
///
/// Fails if the window is NaN.
pub fn select_lines(
    accumulator: &HoughAccumulator,
    level: u8,
    max_abs_angle: Option<f64>,
) -> Result<Vec<DetectedLine>, ImgprocError> {
    if max_abs_angle.is_some_and(|a| a.is_nan()) {
        return Err(ImgprocError::InvalidParameter(
            "angle window must not be NaN".to_string(),
        ));
    }

    Ok(accumulator
        .lines_above(level)
        .into_iter()
        .filter(|line| max_abs_angle.map_or(true, |max| line.angle_degrees().abs() < max))
        .collect())
}

/// Draw the given lines in place and return how many were drawn.
///
/// `half_range` is the one of the accumulator the lines come from.
pub fn draw_lines(
    dst: &mut Raster,
    lines: &[DetectedLine],
    half_range: usize,
) -> Result<usize, ImgprocError> {
    let table = sin_cos_table();

    log::debug!("draw_lines: {} lines on {}", lines.len(), dst.size());

    let mut drawn = 0;
    let mut skipped = 0;
    for line in lines {
        let (sin, cos) = table[line.angle_bucket];
        if cos.abs() < MIN_ABS_COS {
            skipped += 1;
            continue;
        }

        let distance = line.distance(half_range) as f64;
        for y in 0..dst.height() {
            let x = (distance / cos - y as f64 * sin / cos).trunc();
            if x >= 0.0 && x < dst.width() as f64 {
                dst.set_bgr(x as usize, y, LINE_MARKER_COLOR)?;
            }
        }
        drawn += 1;
    }

    if skipped > 0 {
        log::debug!("draw_lines: skipped {skipped} lines with a zero cosine");
    }

    Ok(drawn)
}
