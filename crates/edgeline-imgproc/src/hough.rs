use edgeline_image::{PixelLayout, Raster, RasterSize, BLUE};

use crate::error::ImgprocError;

/// Number of angle buckets, one per integer degree from -90 to 90.
pub const ANGLE_BUCKETS: usize = 181;

/// First-channel value from which a pixel counts as an edge.
pub const EDGE_LEVEL: u8 = 127;

/// Maximum value of an accumulator cell.
pub const MAX_VOTES: u8 = 255;

/// Angle in degrees of an angle bucket.
pub fn angle_degrees(bucket: usize) -> f64 {
    bucket as f64 - 90.0
}

/// Whether an angle lies within 10 degrees of the axes.
///
/// The exact angles -90 and 90 are excluded.
pub fn is_rectilinear_angle(degrees: f64) -> bool {
    let d = degrees.abs();
    d < 10.0 || (d > 80.0 && d < 90.0)
}

/// `(sin, cos)` of every angle bucket.
pub(crate) fn sin_cos_table() -> Vec<(f64, f64)> {
    (0..ANGLE_BUCKETS)
        .map(|bucket| angle_degrees(bucket).to_radians().sin_cos())
        .collect()
}

/// A line whose accumulator cell exceeded a vote level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectedLine {
    /// Row of the accumulator cell; the signed distance is `distance_bucket - half_range`.
    pub distance_bucket: usize,
    /// Column of the accumulator cell; the angle is `angle_bucket - 90` degrees.
    pub angle_bucket: usize,
    /// Saturated vote count of the cell.
    pub votes: u8,
}

impl DetectedLine {
    /// Angle of the line normal in degrees.
    pub fn angle_degrees(&self) -> f64 {
        angle_degrees(self.angle_bucket)
    }

    /// Signed distance of the line from the origin in pixels.
    pub fn distance(&self, half_range: usize) -> isize {
        self.distance_bucket as isize - half_range as isize
    }
}

/// Hough vote table indexed by distance bucket and angle bucket.
///
/// Cells are stored row-major, one row of [`ANGLE_BUCKETS`] cells per
/// distance bucket, and saturate at [`MAX_VOTES`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoughAccumulator {
    distance_buckets: usize,
    votes: Vec<u8>,
}

impl HoughAccumulator {
    /// Number of distance buckets for a raster size.
    ///
    /// This is `ceil(sqrt(2) * sqrt(w^2 + h^2)) * 2 + 1`; the center bucket
    /// stands for distance zero.
    pub fn distance_range(size: RasterSize) -> usize {
        let (w, h) = (size.width as f64, size.height as f64);
        (2.0 * (w * w + h * h)).sqrt().ceil() as usize * 2 + 1
    }

    /// Vote over every angle bucket.
    ///
    /// Every pixel whose first channel is at least [`EDGE_LEVEL`] adds
    /// `vote_increment` to the cell `(round(x cos t + y sin t) + half_range, t)`
    /// for each angle `t`. Cells saturate at [`MAX_VOTES`] once the sweep is
    /// done.
    ///
    /// # Errors
    ///
    /// Fails if `vote_increment` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeline_image::{PixelLayout, Raster};
    /// use edgeline_imgproc::hough::HoughAccumulator;
    ///
    /// let mut edges = Raster::from_size_val([9, 9].into(), PixelLayout::Bgr8, 0).unwrap();
    /// for y in 0..9 {
    ///     edges.set_bgr(4, y, [255, 255, 255]).unwrap();
    /// }
    ///
    /// let acc = HoughAccumulator::build(&edges, 1).unwrap();
    /// assert_eq!(acc.get(4 + acc.half_range(), 90), Some(9));
    /// ```
    pub fn build(src: &Raster, vote_increment: u32) -> Result<Self, ImgprocError> {
        Self::build_with(src, vote_increment, |_| true)
    }

    /// Vote only for angles near the axes, see [`is_rectilinear_angle`].
    ///
    /// Cells of every other angle stay zero.
    pub fn build_rectilinear(src: &Raster, vote_increment: u32) -> Result<Self, ImgprocError> {
        Self::build_with(src, vote_increment, is_rectilinear_angle)
    }

    fn build_with(
        src: &Raster,
        vote_increment: u32,
        angle_filter: impl Fn(f64) -> bool,
    ) -> Result<Self, ImgprocError> {
        if vote_increment == 0 {
            return Err(ImgprocError::InvalidParameter(
                "vote increment must be positive".to_string(),
            ));
        }

        let distance_buckets = Self::distance_range(src.size());
        let half_range = distance_buckets / 2;

        log::debug!(
            "hough: {} into {distance_buckets}x{ANGLE_BUCKETS} cells, increment {vote_increment}",
            src.size()
        );

        let angles = sin_cos_table()
            .into_iter()
            .enumerate()
            .filter(|&(bucket, _)| angle_filter(angle_degrees(bucket)))
            .collect::<Vec<_>>();

        let mut counts = vec![0u32; distance_buckets * ANGLE_BUCKETS];
        let mut edge_pixels = 0usize;

        for y in 0..src.height() {
            for x in 0..src.width() {
                if !src.get(x, y, BLUE).is_some_and(|v| v >= EDGE_LEVEL) {
                    continue;
                }
                edge_pixels += 1;
                for &(bucket, (sin, cos)) in &angles {
                    let rho = (x as f64 * cos + y as f64 * sin).round() as isize;
                    let Some(distance) = half_range.checked_add_signed(rho) else {
                        continue;
                    };
                    if let Some(cell) = counts.get_mut(distance * ANGLE_BUCKETS + bucket) {
                        *cell = cell.saturating_add(vote_increment);
                    }
                }
            }
        }

        log::debug!("hough: {edge_pixels} edge pixels voted");

        let votes = counts
            .into_iter()
            .map(|c| c.min(MAX_VOTES as u32) as u8)
            .collect();

        Ok(Self {
            distance_buckets,
            votes,
        })
    }

    /// Number of distance buckets.
    pub fn distance_buckets(&self) -> usize {
        self.distance_buckets
    }

    /// Distance bucket that stands for distance zero.
    pub fn half_range(&self) -> usize {
        self.distance_buckets / 2
    }

    /// Votes of a cell.
    pub fn get(&self, distance_bucket: usize, angle_bucket: usize) -> Option<u8> {
        if angle_bucket >= ANGLE_BUCKETS {
            return None;
        }
        self.votes
            .get(distance_bucket * ANGLE_BUCKETS + angle_bucket)
            .copied()
    }

    /// Row-major cells.
    pub fn as_slice(&self) -> &[u8] {
        &self.votes
    }

    /// Every cell with more than `level` votes, in row-major order.
    pub fn lines_above(&self, level: u8) -> Vec<DetectedLine> {
        self.votes
            .iter()
            .enumerate()
            .filter(|&(_, &votes)| votes > level)
            .map(|(i, &votes)| DetectedLine {
                distance_bucket: i / ANGLE_BUCKETS,
                angle_bucket: i % ANGLE_BUCKETS,
                votes,
            })
            .collect()
    }

    /// Render the accumulator as a grayscale BGR raster.
    ///
    /// The raster is [`ANGLE_BUCKETS`] pixels wide and one row per distance
    /// bucket tall.
    pub fn to_raster(&self) -> Result<Raster, ImgprocError> {
        let size = RasterSize {
            width: ANGLE_BUCKETS,
            height: self.distance_buckets,
        };
        let data = self.votes.iter().flat_map(|&v| [v, v, v]).collect();
        Ok(Raster::new(size, PixelLayout::Bgr8, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_line(size: usize, column: usize) -> Result<Raster, ImgprocError> {
        let mut raster = Raster::from_size_val([size, size].into(), PixelLayout::Bgr8, 0)?;
        for y in 0..size {
            raster.set_bgr(column, y, [255, 255, 255])?;
        }
        Ok(raster)
    }

    #[test]
    fn test_distance_range() {
        // ceil(sqrt(2 * (101^2 + 101^2))) = 202
        assert_eq!(HoughAccumulator::distance_range([101, 101].into()), 405);
        assert_eq!(HoughAccumulator::distance_range([3, 4].into()), 17);
    }

    #[test]
    fn test_rectilinear_angles() {
        assert!(is_rectilinear_angle(0.0));
        assert!(is_rectilinear_angle(-9.0));
        assert!(is_rectilinear_angle(89.0));
        assert!(is_rectilinear_angle(-81.0));
        assert!(!is_rectilinear_angle(10.0));
        assert!(!is_rectilinear_angle(80.0));
        assert!(!is_rectilinear_angle(90.0));
        assert!(!is_rectilinear_angle(-90.0));
        assert!(!is_rectilinear_angle(45.0));
    }

    #[test]
    fn test_vertical_line_peak() -> Result<(), ImgprocError> {
        let edges = vertical_line(101, 50)?;
        let acc = HoughAccumulator::build(&edges, 1)?;
        assert_eq!(acc.distance_buckets(), 405);
        assert_eq!(acc.half_range(), 202);

        let peak = acc.get(50 + acc.half_range(), 90);
        assert_eq!(peak, Some(101));

        let runner_up = acc
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != (50 + 202) * ANGLE_BUCKETS + 90)
            .map(|(_, &v)| v)
            .max();
        assert!(runner_up.is_some_and(|v| v <= 60));
        Ok(())
    }

    #[test]
    fn test_votes_saturate() -> Result<(), ImgprocError> {
        let edges = vertical_line(101, 50)?;
        let acc = HoughAccumulator::build(&edges, 3)?;
        assert_eq!(acc.get(50 + acc.half_range(), 90), Some(MAX_VOTES));
        Ok(())
    }

    #[test]
    fn test_weak_pixels_do_not_vote() -> Result<(), ImgprocError> {
        let edges = Raster::from_size_val([5, 5].into(), PixelLayout::Bgr8, 126)?;
        let acc = HoughAccumulator::build(&edges, 1)?;
        assert!(acc.as_slice().iter().all(|&v| v == 0));
        assert!(HoughAccumulator::build(&edges, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_rectilinear_build() -> Result<(), ImgprocError> {
        let edges = vertical_line(31, 10)?;
        let acc = HoughAccumulator::build_rectilinear(&edges, 1)?;
        for d in 0..acc.distance_buckets() {
            for a in 0..ANGLE_BUCKETS {
                if !is_rectilinear_angle(angle_degrees(a)) {
                    assert_eq!(acc.get(d, a), Some(0), "({d}, {a})");
                }
            }
        }
        assert_eq!(acc.get(10 + acc.half_range(), 90), Some(31));
        Ok(())
    }

    #[test]
    fn test_lines_above_and_raster() -> Result<(), ImgprocError> {
        let edges = vertical_line(101, 50)?;
        let acc = HoughAccumulator::build(&edges, 1)?;

        let lines = acc.lines_above(60);
        assert_eq!(
            lines,
            vec![DetectedLine {
                distance_bucket: 50 + acc.half_range(),
                angle_bucket: 90,
                votes: 101,
            }]
        );
        assert_eq!(lines[0].distance(acc.half_range()), 50);
        assert_eq!(lines[0].angle_degrees(), 0.0);

        let raster = acc.to_raster()?;
        assert_eq!(raster.width(), ANGLE_BUCKETS);
        assert_eq!(raster.height(), acc.distance_buckets());
        assert_eq!(
            raster.pixel(90, 50 + acc.half_range()),
            Some(&[101u8, 101, 101][..])
        );
        Ok(())
    }
}
