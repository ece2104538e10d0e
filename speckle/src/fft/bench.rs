//! Benchmark module for FFT convolution.
//! Run with: cargo bench -p speckle --features bench --bench fft_convolution

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

use super::FftConvolver;
use crate::array::{Image, Interval};
use crate::kernel::create_log_kernel;

/// Register FFT convolution benchmarks with Criterion.
pub fn benchmarks(c: &mut Criterion) {
    benchmark_convolve_2d(c);
    benchmark_convolve_3d(c);
    benchmark_kernel_spectrum(c);
}

fn test_image(dims: &[usize]) -> Image {
    Image::from_fn(Interval::from_dimensions(dims), |p| {
        p.iter()
            .enumerate()
            .map(|(d, &v)| ((v as f32) * (0.13 + 0.07 * d as f32)).sin())
            .sum()
    })
}

fn benchmark_convolve_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_convolve_2d");

    for size in [128, 256, 512] {
        let image = test_image(&[size, size]);
        let kernel = create_log_kernel(3.0, 2, &[1.0, 1.0]);
        let convolver = match FftConvolver::new(&kernel, image.interval()) {
            Ok(convolver) => convolver,
            Err(err) => panic!("thread pool: {err}"),
        };
        let mut output = Image::zeros(image.interval().clone());

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::new("convolve", format!("{size}x{size}")), |b| {
            b.iter(|| {
                let _ = convolver.convolve(black_box(&image), &mut output);
                black_box(output.pixels()[0])
            })
        });
    }

    group.finish();
}

fn benchmark_convolve_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_convolve_3d");
    group.sample_size(20);

    for (size, depth) in [(64, 16), (128, 32)] {
        let image = test_image(&[size, size, depth]);
        let kernel = create_log_kernel(3.0, 3, &[1.0, 1.0, 2.0]);
        let convolver = match FftConvolver::new(&kernel, image.interval()) {
            Ok(convolver) => convolver,
            Err(err) => panic!("thread pool: {err}"),
        };
        let mut output = Image::zeros(image.interval().clone());

        group.throughput(Throughput::Elements((size * size * depth) as u64));
        group.bench_function(
            BenchmarkId::new("convolve", format!("{size}x{size}x{depth}")),
            |b| {
                b.iter(|| {
                    let _ = convolver.convolve(black_box(&image), &mut output);
                    black_box(output.pixels()[0])
                })
            },
        );
    }

    group.finish();
}

fn benchmark_kernel_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_kernel_spectrum");
    let interval = Interval::from_dimensions(&[512, 512]);

    for radius in [2.0, 5.0, 10.0] {
        let kernel = create_log_kernel(radius, 2, &[1.0, 1.0]);
        group.bench_function(BenchmarkId::new("new", format!("r{radius}")), |b| {
            b.iter(|| black_box(FftConvolver::new(black_box(&kernel), &interval).is_ok()))
        });
    }

    group.finish();
}
