use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use edgeline_image::{PixelLayout, Raster};
use edgeline_imgproc::{
    filter::{convolve_with, KernelKind},
    gradient::sobel,
    hough::HoughAccumulator,
    median::median_filter,
    parallel::ExecutionStrategy,
};

fn test_raster(width: usize, height: usize) -> Raster {
    let data = (0..width * height * 3)
        .map(|i| ((i * 7 + i / 3) % 256) as u8)
        .collect();
    Raster::new([width, height].into(), PixelLayout::Bgr8, data).unwrap()
}

fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Convolve");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let image = test_raster(*width, *height);

        for kind in [KernelKind::Gaussian3x3, KernelKind::Gaussian5x5, KernelKind::Mean9x9] {
            let (kernel, scale) = kind.with_scale();

            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}_parallel"), &parameter_string),
                &image,
                |b, i| {
                    b.iter(|| {
                        black_box(convolve_with(
                            i,
                            &kernel,
                            scale,
                            ExecutionStrategy::ParallelRows,
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}_serial"), &parameter_string),
                &image,
                |b, i| {
                    b.iter(|| black_box(convolve_with(i, &kernel, scale, ExecutionStrategy::Serial)))
                },
            );
        }
    }
    group.finish();
}

fn bench_edge_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("EdgeStages");

    for (width, height) in [(256, 224), (512, 448)].iter() {
        let parameter_string = format!("{}x{}", width, height);
        let image = test_raster(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("sobel", &parameter_string),
            &image,
            |b, i| b.iter(|| black_box(sobel(i))),
        );

        group.bench_with_input(
            BenchmarkId::new("median_3", &parameter_string),
            &image,
            |b, i| b.iter(|| black_box(median_filter(i, 3))),
        );

        group.bench_with_input(
            BenchmarkId::new("hough", &parameter_string),
            &image,
            |b, i| b.iter(|| black_box(HoughAccumulator::build(i, 1))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_convolve, bench_edge_stages);
criterion_main!(benches);
