use edgeline_image::{Raster, ALPHA, BLUE, GREEN, RED};

use crate::error::ImgprocError;
use crate::gradient::DirectionField;
use crate::parallel::{self, ExecutionStrategy};

/// Pair of neighbours a pixel is compared against, picked from its direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighbourPair {
    /// Left and right, `|angle| < 22.5`.
    Horizontal,
    /// Above and below, `angle > 67.5`.
    Vertical,
    /// Top-left and bottom-right, `-67.5 < angle <= -22.5`.
    Falling,
    /// Bottom-left and top-right, `22.5 < angle <= 67.5`.
    Rising,
}

impl NeighbourPair {
    /// Pick the neighbour pair for a direction in degrees.
    ///
    /// Returns `None` for directions outside every bin, i.e. `angle <= -67.5`,
    /// exactly `22.5` and NaN. Such pixels are suppressed.
    pub fn from_angle(angle: f64) -> Option<Self> {
        if angle.abs() < 22.5 {
            Some(Self::Horizontal)
        } else if angle > 67.5 {
            Some(Self::Vertical)
        } else if angle > -67.5 && angle <= -22.5 {
            Some(Self::Falling)
        } else if angle > 22.5 && angle <= 67.5 {
            Some(Self::Rising)
        } else {
            None
        }
    }

    /// Offsets `(dx, dy)` of the two neighbours.
    pub fn offsets(self) -> [(isize, isize); 2] {
        match self {
            Self::Horizontal => [(-1, 0), (1, 0)],
            Self::Vertical => [(0, -1), (0, 1)],
            Self::Falling => [(-1, -1), (1, 1)],
            Self::Rising => [(-1, 1), (1, -1)],
        }
    }
}

/// Thin gradient ridges to one pixel.
///
/// An interior pixel keeps its magnitude when its first channel is at least
/// as large as the first channel of both neighbours along its direction, see
/// [`NeighbourPair::from_angle`]. Everything else, the border ring included,
/// becomes zero. Alpha is carried from the magnitude raster.
///
/// # Errors
///
/// Fails if the direction field and the magnitude raster differ in size.
pub fn non_max_suppression(
    magnitude: &Raster,
    direction: &DirectionField,
) -> Result<Raster, ImgprocError> {
    non_max_suppression_with(magnitude, direction, ExecutionStrategy::default())
}

/// Same as [`non_max_suppression`] with an explicit execution strategy.
pub fn non_max_suppression_with(
    magnitude: &Raster,
    direction: &DirectionField,
    strategy: ExecutionStrategy,
) -> Result<Raster, ImgprocError> {
    if magnitude.size() != direction.size() {
        return Err(ImgprocError::InvalidParameter(format!(
            "magnitude {} and direction {} differ in size",
            magnitude.size(),
            direction.size()
        )));
    }

    log::debug!("non_max_suppression: {}", magnitude.size());

    let (width, height) = (magnitude.width(), magnitude.height());
    let channels = magnitude.num_channels();
    let has_alpha = magnitude.has_alpha();
    let mut dst = magnitude.zeros_like();

    parallel::for_each_row(strategy, &mut dst, |y, dst_row| {
        let Some(src_row) = magnitude.row(y) else {
            return;
        };
        if has_alpha {
            for x in 0..width {
                dst_row[x * channels + ALPHA] = src_row[x * channels + ALPHA];
            }
        }

        if y == 0 || y + 1 >= height {
            return;
        }

        for x in 1..width - 1 {
            let Some(pair) = direction.get(x, y).and_then(NeighbourPair::from_angle) else {
                continue;
            };

            let center = src_row[x * channels + BLUE];
            let is_max = pair.offsets().iter().all(|&(dx, dy)| {
                let nx = x.wrapping_add_signed(dx);
                let ny = y.wrapping_add_signed(dy);
                magnitude
                    .get(nx, ny, BLUE)
                    .is_some_and(|neighbour| center >= neighbour)
            });

            if is_max {
                for ch in [BLUE, GREEN, RED] {
                    dst_row[x * channels + ch] = src_row[x * channels + ch];
                }
            }
        }
    })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeline_image::{PixelLayout, RasterSize};

    fn field(size: RasterSize, angle: f64) -> Result<DirectionField, ImgprocError> {
        DirectionField::from_vec(size, vec![angle; size.width * size.height])
    }

    #[test]
    fn test_neighbour_pair_bins() {
        assert_eq!(NeighbourPair::from_angle(0.0), Some(NeighbourPair::Horizontal));
        assert_eq!(NeighbourPair::from_angle(-22.4), Some(NeighbourPair::Horizontal));
        assert_eq!(NeighbourPair::from_angle(90.0), Some(NeighbourPair::Vertical));
        assert_eq!(NeighbourPair::from_angle(67.6), Some(NeighbourPair::Vertical));
        assert_eq!(NeighbourPair::from_angle(67.5), Some(NeighbourPair::Rising));
        assert_eq!(NeighbourPair::from_angle(45.0), Some(NeighbourPair::Rising));
        assert_eq!(NeighbourPair::from_angle(-22.5), Some(NeighbourPair::Falling));
        assert_eq!(NeighbourPair::from_angle(-45.0), Some(NeighbourPair::Falling));
        assert_eq!(NeighbourPair::from_angle(22.5), None);
        assert_eq!(NeighbourPair::from_angle(-67.5), None);
        assert_eq!(NeighbourPair::from_angle(-80.0), None);
        assert_eq!(NeighbourPair::from_angle(f64::NAN), None);

        // a zero horizontal response is binned whatever the vertical sign
        for vertical in [-3.0, 0.0, 3.0] {
            let angle = crate::gradient::direction_degrees(vertical, 0.0);
            assert_eq!(NeighbourPair::from_angle(angle), Some(NeighbourPair::Vertical));
        }
    }

    #[test]
    fn test_nms_thins_horizontal_ridge() -> Result<(), ImgprocError> {
        let size = RasterSize {
            width: 5,
            height: 3,
        };
        let mut magnitude = Raster::from_size_val(size, PixelLayout::Bgr8, 0)?;
        for (x, v) in [(1, 40), (2, 90), (3, 60)] {
            magnitude.set_bgr(x, 1, [v, v, v])?;
        }

        let dst = non_max_suppression(&magnitude, &field(size, 0.0)?)?;
        assert_eq!(dst.pixel(1, 1), Some(&[0u8, 0, 0][..]));
        assert_eq!(dst.pixel(2, 1), Some(&[90u8, 90, 90][..]));
        assert_eq!(dst.pixel(3, 1), Some(&[0u8, 0, 0][..]));
        Ok(())
    }

    #[test]
    fn test_nms_plateau_is_kept() -> Result<(), ImgprocError> {
        let size = RasterSize {
            width: 5,
            height: 5,
        };
        let magnitude = Raster::from_size_val(size, PixelLayout::Bgr8, 50)?;
        let dst = non_max_suppression(&magnitude, &field(size, 90.0)?)?;

        for y in 0..5 {
            for x in 0..5 {
                let expected = if magnitude.is_interior(x, y, 1) { 50 } else { 0 };
                assert_eq!(dst.get(x, y, BLUE), Some(expected), "({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn test_nms_compares_first_channel() -> Result<(), ImgprocError> {
        let size = RasterSize {
            width: 3,
            height: 3,
        };
        let mut magnitude = Raster::from_size_val(size, PixelLayout::Bgra8, 200)?;
        // center wins on blue while losing on green and red
        magnitude.set_bgr(1, 1, [210, 10, 20])?;
        magnitude.set_bgr(0, 1, [100, 250, 250])?;
        magnitude.set_bgr(2, 1, [100, 250, 250])?;

        let dst = non_max_suppression(&magnitude, &field(size, 10.0)?)?;
        assert_eq!(dst.pixel(1, 1), Some(&[210u8, 10, 20, 200][..]));
        assert_eq!(dst.pixel(0, 0), Some(&[0u8, 0, 0, 200][..]));
        Ok(())
    }

    #[test]
    fn test_nms_unbinned_direction_is_suppressed() -> Result<(), ImgprocError> {
        let size = RasterSize {
            width: 3,
            height: 3,
        };
        let mut magnitude = Raster::from_size_val(size, PixelLayout::Bgr8, 0)?;
        magnitude.set_bgr(1, 1, [255, 255, 255])?;

        let dst = non_max_suppression(&magnitude, &field(size, -80.0)?)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_nms_diagonals() -> Result<(), ImgprocError> {
        let size = RasterSize {
            width: 3,
            height: 3,
        };
        let mut magnitude = Raster::from_size_val(size, PixelLayout::Bgr8, 0)?;
        magnitude.set_bgr(1, 1, [100, 100, 100])?;
        // a stronger top-right neighbour only matters for the rising bin
        magnitude.set_bgr(2, 0, [150, 150, 150])?;

        let rising = non_max_suppression(&magnitude, &field(size, 45.0)?)?;
        assert_eq!(rising.get(1, 1, BLUE), Some(0));

        let falling = non_max_suppression(&magnitude, &field(size, -45.0)?)?;
        assert_eq!(falling.get(1, 1, BLUE), Some(100));
        Ok(())
    }

    #[test]
    fn test_nms_size_mismatch() -> Result<(), ImgprocError> {
        let magnitude = Raster::from_size_val([4, 4].into(), PixelLayout::Bgr8, 0)?;
        let direction = DirectionField::new([4, 5].into());
        let res = non_max_suppression(&magnitude, &direction);
        assert!(matches!(res, Err(ImgprocError::InvalidParameter(_))));
        Ok(())
    }
}
