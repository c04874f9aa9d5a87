use serde::{Deserialize, Serialize};

use edgeline_image::Raster;
use edgeline_imgproc::{
    color::gray_from_bgr_with,
    filter::{convolve_with, KernelKind},
    gradient::gradient_with,
    hough::{DetectedLine, HoughAccumulator},
    hysteresis::hysteresis,
    lines::{draw_lines, select_lines},
    nms::non_max_suppression_with,
    parallel::ExecutionStrategy,
    threshold::double_threshold_with,
    ImgprocError,
};

/// Options for [`detect_lines`].
///
/// Missing fields take their default when deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectionConfig {
    /// Kernel used to smooth the grayscale raster; its catalog scale is applied.
    pub smoothing: KernelKind,
    /// Kernel whose red response is the numerator of the direction ratio.
    pub gradient_vertical: KernelKind,
    /// Kernel whose red response is the denominator of the direction ratio.
    pub gradient_horizontal: KernelKind,
    /// Scale applied to the gradient magnitude.
    pub gradient_scale: f64,
    /// Fraction of 255 below which a pixel is not an edge.
    pub low_threshold: f64,
    /// Fraction of 255 above which a pixel is a strong edge.
    pub high_threshold: f64,
    /// Votes added per edge pixel and angle.
    pub vote_increment: u32,
    /// Vote only for angles within 10 degrees of the axes.
    pub rectilinear: bool,
    /// Lines need strictly more votes than this.
    pub render_level: u8,
    /// Only keep lines with `|angle|` below this many degrees.
    pub render_max_abs_angle: Option<f64>,
    /// How the per-row stages run.
    pub execution: ExecutionStrategy,
}

impl Default for LineDetectionConfig {
    fn default() -> Self {
        Self {
            smoothing: KernelKind::Gaussian3x3,
            gradient_vertical: KernelKind::SobelVertical,
            gradient_horizontal: KernelKind::SobelHorizontal,
            gradient_scale: 1.0,
            low_threshold: 0.3,
            high_threshold: 0.7,
            vote_increment: 1,
            rectilinear: false,
            render_level: 90,
            render_max_abs_angle: None,
            execution: ExecutionStrategy::default(),
        }
    }
}

impl LineDetectionConfig {
    /// Check the options that the stages would otherwise reject halfway through.
    pub fn validate(&self) -> Result<(), ImgprocError> {
        let (low, high) = (self.low_threshold, self.high_threshold);
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
            return Err(ImgprocError::InvalidParameter(format!(
                "thresholds must satisfy 0 <= low < high <= 1, got {low} and {high}"
            )));
        }
        if self.vote_increment == 0 {
            return Err(ImgprocError::InvalidParameter(
                "vote increment must be positive".to_string(),
            ));
        }
        if self.gradient_vertical.side() != self.gradient_horizontal.side() {
            return Err(ImgprocError::InvalidParameter(format!(
                "gradient kernels {:?} and {:?} differ in size",
                self.gradient_vertical, self.gradient_horizontal
            )));
        }
        if !self.gradient_scale.is_finite() {
            return Err(ImgprocError::InvalidParameter(format!(
                "gradient scale must be finite, got {}",
                self.gradient_scale
            )));
        }
        if self.render_max_abs_angle.is_some_and(|a| a.is_nan()) {
            return Err(ImgprocError::InvalidParameter(
                "angle window must not be NaN".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything [`detect_lines`] produces.
#[derive(Clone, Debug)]
pub struct LineDetection {
    /// Binary edge raster after hysteresis, values 0 or 255.
    pub edges: Raster,
    /// Hough votes of the edge raster.
    pub accumulator: HoughAccumulator,
    /// Lines above the render level inside the angle window.
    ///
    /// Lines at +-90 degrees are listed but not drawn on `annotated`.
    pub lines: Vec<DetectedLine>,
    /// Copy of the source with the lines drawn on it.
    pub annotated: Raster,
}

/// Detect straight lines in a BGR(A) raster.
///
/// Runs grayscale conversion, smoothing, gradient, non-maximum suppression,
/// double threshold, hysteresis, Hough voting and line rendering. The source
/// is not modified; lines are drawn on a copy.
///
/// # Errors
///
/// Fails if the configuration is invalid or a stage rejects the raster, e.g.
/// when it is smaller than the smoothing kernel.
///
/// # Examples
///
/// ```
/// use edgeline::image::{PixelLayout, Raster};
/// use edgeline::pipeline::{detect_lines, LineDetectionConfig};
///
/// let src = Raster::from_size_val([32, 32].into(), PixelLayout::Bgr8, 0).unwrap();
/// let detection = detect_lines(&src, &LineDetectionConfig::default()).unwrap();
///
/// assert!(detection.lines.is_empty());
/// assert_eq!(detection.annotated, src);
/// ```
pub fn detect_lines(
    src: &Raster,
    config: &LineDetectionConfig,
) -> Result<LineDetection, ImgprocError> {
    config.validate()?;
    let strategy = config.execution;

    log::debug!("detect_lines: {} with {:?}", src.size(), config);

    let gray = gray_from_bgr_with(src, strategy)?;

    let (smoothing, smoothing_scale) = config.smoothing.with_scale();
    let smoothed = convolve_with(&gray, &smoothing, smoothing_scale, strategy)?;

    let (magnitude, direction) = gradient_with(
        &smoothed,
        &config.gradient_vertical.kernel(),
        &config.gradient_horizontal.kernel(),
        config.gradient_scale,
        strategy,
    )?
    .into_parts();

    let thin = non_max_suppression_with(&magnitude, &direction, strategy)?;

    let mut edges = double_threshold_with(
        &thin,
        config.low_threshold,
        config.high_threshold,
        strategy,
    )?;
    hysteresis(&mut edges)?;

    let accumulator = if config.rectilinear {
        HoughAccumulator::build_rectilinear(&edges, config.vote_increment)?
    } else {
        HoughAccumulator::build(&edges, config.vote_increment)?
    };

    let lines = select_lines(
        &accumulator,
        config.render_level,
        config.render_max_abs_angle,
    )?;

    let mut annotated = src.clone();
    let drawn = draw_lines(&mut annotated, &lines, accumulator.half_range())?;

    log::debug!("detect_lines: {} lines, {drawn} drawn", lines.len());

    Ok(LineDetection {
        edges,
        accumulator,
        lines,
        annotated,
    })
}
