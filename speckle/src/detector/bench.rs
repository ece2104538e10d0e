//! Benchmark module for the full LoG detection pipeline.
//! Run with: cargo bench -p speckle --features bench --bench detection

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

use super::{LogDetector, LogDetectorConfig};
use crate::array::{Image, Interval};

/// Register detection benchmarks with Criterion.
pub fn benchmarks(c: &mut Criterion) {
    benchmark_detect_2d(c);
    benchmark_thread_counts(c);
}

/// Grid of Gaussian spots with a fixed sigma on a flat background.
fn generate_spot_field(size: usize, spacing: usize, sigma: f32) -> Image {
    let two_sigma_sq = 2.0 * sigma * sigma;
    Image::from_fn(Interval::from_dimensions(&[size, size]), |p| {
        let fx = (p[0] as usize % spacing) as f32 - spacing as f32 / 2.0;
        let fy = (p[1] as usize % spacing) as f32 - spacing as f32 / 2.0;
        10.0 + 100.0 * (-(fx * fx + fy * fy) / two_sigma_sq).exp()
    })
}

fn config(sub_pixel: bool) -> LogDetectorConfig {
    LogDetectorConfig::default()
        .with_radius(4.0)
        .with_threshold(0.5)
        .with_sub_pixel(sub_pixel)
}

fn benchmark_detect_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_detect_2d");
    group.sample_size(20);

    for size in [256, 1024] {
        let image = generate_spot_field(size, 32, 2.8);
        group.throughput(Throughput::Elements((size * size) as u64));

        for sub_pixel in [false, true] {
            let label = if sub_pixel { "subpixel" } else { "pixel" };
            group.bench_function(BenchmarkId::new(label, format!("{size}x{size}")), |b| {
                b.iter(|| {
                    let mut detector = LogDetector::new(Some(black_box(&image)), config(sub_pixel));
                    black_box(detector.process().map(|spots| spots.len()).unwrap_or(0))
                })
            });
        }
    }

    group.finish();
}

fn benchmark_thread_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_detect_threads");
    group.sample_size(20);
    let image = generate_spot_field(1024, 32, 2.8);

    for threads in [1, 2, 4, 8] {
        group.bench_function(BenchmarkId::new("threads", threads), |b| {
            b.iter(|| {
                let mut detector = LogDetector::new(Some(&image), config(true));
                detector.set_num_threads(threads);
                black_box(detector.process().map(|spots| spots.len()).unwrap_or(0))
            })
        });
    }

    group.finish();
}
