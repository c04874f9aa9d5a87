use rand::{rngs::StdRng, Rng, SeedableRng};

use edgeline_image::{PixelLayout, Raster, RasterSize, ALPHA};
use edgeline_imgproc::{
    filter::{convolve, convolve_with, KernelKind},
    gradient::{gradient, sobel},
    hough::HoughAccumulator,
    hysteresis::hysteresis,
    median::median_filter,
    nms::non_max_suppression,
    parallel::ExecutionStrategy,
    threshold::double_threshold,
    ImgprocError,
};

fn random_raster(rng: &mut StdRng, layout: PixelLayout) -> Result<Raster, ImgprocError> {
    let size = RasterSize {
        width: rng.random_range(9..24),
        height: rng.random_range(9..24),
    };
    let data = (0..size.width * size.height * layout.channels())
        .map(|_| rng.random())
        .collect();
    Ok(Raster::new(size, layout, data)?)
}

fn canny_edges(src: &Raster) -> Result<Raster, ImgprocError> {
    let field = sobel(src)?;
    let thin = non_max_suppression(&field.magnitude, &field.direction)?;
    double_threshold(&thin, 0.3, 0.7)
}

#[test]
fn test_convolution_border_and_alpha_pass_through() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(7);
    for kind in KernelKind::ALL {
        let src = random_raster(&mut rng, PixelLayout::Bgra8)?;
        let (kernel, scale) = kind.with_scale();
        let dst = convolve(&src, &kernel, scale)?;

        for y in 0..src.height() {
            for x in 0..src.width() {
                if !src.is_interior(x, y, kernel.border()) {
                    assert_eq!(dst.pixel(x, y), src.pixel(x, y), "{kind:?} ({x}, {y})");
                }
                assert_eq!(dst.get(x, y, ALPHA), src.get(x, y, ALPHA), "{kind:?} ({x}, {y})");
            }
        }
    }
    Ok(())
}

#[test]
fn test_flat_field_is_preserved_by_blurs() -> Result<(), ImgprocError> {
    let blurs = [
        KernelKind::Gaussian3x3,
        KernelKind::Gaussian5x5,
        KernelKind::Mean3x3,
        KernelKind::Mean5x5,
        KernelKind::Mean7x7,
        KernelKind::Mean9x9,
        KernelKind::MotionBlur5x5At45,
        KernelKind::MotionBlur7x7At135,
        KernelKind::MotionBlur9x9At45,
    ];
    let mut src = Raster::from_size_val([12, 12].into(), PixelLayout::Bgr8, 0)?;
    for y in 0..12 {
        for x in 0..12 {
            src.set_bgr(x, y, [17, 140, 251])?;
        }
    }

    for kind in blurs {
        let (kernel, scale) = kind.with_scale();
        let dst = convolve(&src, &kernel, scale)?;
        for (a, b) in dst.as_slice().iter().zip(src.as_slice()) {
            assert!(a.abs_diff(*b) <= 1, "{kind:?}: {a} vs {b}");
        }
    }
    Ok(())
}

#[test]
fn test_zero_gradient_on_uniform_raster() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5 {
        let value = rng.random();
        let src = Raster::from_size_val([15, 10].into(), PixelLayout::Bgr8, value)?;
        let field = sobel(&src)?;
        assert!(field.magnitude.as_slice().iter().all(|&v| v == 0));
        // every interior direction hits the zero-response fallback
        for y in 1..9 {
            for x in 1..14 {
                assert_eq!(field.direction.get(x, y), Some(90.0));
            }
        }
    }
    Ok(())
}

#[test]
fn test_direction_range() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(13);
    let src = random_raster(&mut rng, PixelLayout::Bgr8)?;
    let field = gradient(
        &src,
        &KernelKind::PrewittVertical.kernel(),
        &KernelKind::PrewittHorizontal.kernel(),
        1.0,
    )?;
    assert!(field
        .direction
        .as_slice()
        .iter()
        .all(|&a| a > -90.0 && a <= 90.0));
    Ok(())
}

#[test]
fn test_suppression_only_keeps_or_zeroes() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..5 {
        let src = random_raster(&mut rng, PixelLayout::Bgr8)?;
        let field = sobel(&src)?;
        let thin = non_max_suppression(&field.magnitude, &field.direction)?;

        for y in 0..src.height() {
            for x in 0..src.width() {
                let kept = thin.pixel(x, y);
                assert!(
                    kept == field.magnitude.pixel(x, y) || kept == Some(&[0u8, 0, 0][..]),
                    "({x}, {y})"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_threshold_and_hysteresis_ranges() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..5 {
        let src = random_raster(&mut rng, PixelLayout::Bgr8)?;
        let mut edges = canny_edges(&src)?;
        assert!(edges.as_slice().iter().all(|v| [0, 127, 255].contains(v)));

        hysteresis(&mut edges)?;
        assert!(edges.as_slice().iter().all(|v| [0, 255].contains(v)));
    }
    Ok(())
}

#[test]
fn test_votes_are_bounded() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(23);
    let src = random_raster(&mut rng, PixelLayout::Bgr8)?;
    // a large increment saturates many cells
    let acc = HoughAccumulator::build(&src, 200)?;
    assert!(acc.as_slice().iter().any(|&v| v == 255));
    assert_eq!(
        acc.as_slice().len(),
        acc.distance_buckets() * edgeline_imgproc::hough::ANGLE_BUCKETS
    );
    Ok(())
}

#[test]
fn test_median_is_idempotent_on_constant_raster() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(29);
    for window in [1, 3, 5, 7] {
        let bgra = [rng.random(), rng.random(), rng.random(), rng.random()];
        let mut src = Raster::from_size_val([9, 9].into(), PixelLayout::Bgra8, 0)?;
        for y in 0..9 {
            for x in 0..9 {
                if let Some(pixel) = src.pixel_mut(x, y) {
                    pixel.copy_from_slice(&bgra);
                }
            }
        }
        let once = median_filter(&src, window)?;
        let twice = median_filter(&once, window)?;
        assert_eq!(once, src);
        assert_eq!(twice, src);
    }
    Ok(())
}

#[test]
fn test_strategies_are_byte_identical() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(31);
    let src = random_raster(&mut rng, PixelLayout::Bgra8)?;
    let (kernel, scale) = KernelKind::LaplacianOfGaussian.with_scale();

    let reference = convolve_with(&src, &kernel, scale, ExecutionStrategy::Serial)?;
    for strategy in [ExecutionStrategy::ParallelRows, ExecutionStrategy::Fixed(4)] {
        assert_eq!(convolve_with(&src, &kernel, scale, strategy)?, reference);
    }
    Ok(())
}
