//! Benchmarks for contour line generation and drawing.
//!
//! Run with: cargo bench --package renderer --bench contour_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::contour::{
    connect_segments, draw_contours, generate_all_contours, march_squares, ContourConfig, Point,
};
use renderer::layout::PixelRect;
use tiny_skia::Pixmap;

/// Shelf deepening eastwards with ridges, land (NaN) along the west edge.
fn generate_shelf_field(width: usize, height: usize) -> Vec<f32> {
    let mut data = vec![f32::NAN; width * height];

    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;

            let coast = 0.1 + 0.05 * (fy * std::f32::consts::PI * 3.0).sin();
            if fx < coast {
                continue;
            }

            let ridge = (fx * std::f32::consts::PI * 6.0).sin() * (fy * std::f32::consts::PI * 4.0).cos();
            data[y * width + x] = (fx - coast) * 300.0 + ridge * 15.0;
        }
    }
    data
}

fn bathymetry_config() -> ContourConfig {
    ContourConfig {
        levels: vec![20.0, 50.0, 100.0, 200.0],
        line_width: 1.0,
        ..ContourConfig::default()
    }
}

// =============================================================================
// MARCHING SQUARES BENCHMARKS
// =============================================================================

fn bench_march_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("march_squares");

    let sizes = [(64, 64), (128, 128), (256, 256)];

    for (width, height) in sizes {
        let data = generate_shelf_field(width, height);

        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::new("shelf_100m", format!("{}x{}", width, height)),
            &data,
            |b, data| {
                b.iter(|| march_squares(black_box(data), width, height, black_box(100.0)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// SEGMENT CONNECTION BENCHMARKS
// =============================================================================

fn bench_connect_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_segments");

    for (width, height) in [(64, 64), (128, 128)] {
        let data = generate_shelf_field(width, height);
        let segments = march_squares(&data, width, height, 50.0);

        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("shelf", format!("{}x{}_{}seg", width, height, segments.len())),
            &segments,
            |b, segs| {
                b.iter(|| connect_segments(black_box(segs.clone()), 50.0));
            },
        );
    }

    group.finish();
}

// =============================================================================
// FULL PIPELINE BENCHMARKS
// =============================================================================

fn bench_generate_all_contours(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all_contours");
    group.sample_size(20);

    let config = bathymetry_config();
    for (width, height) in [(97, 97), (193, 193)] {
        let data = generate_shelf_field(width, height);

        group.bench_with_input(
            BenchmarkId::new("4_levels", format!("{}x{}", width, height)),
            &data,
            |b, data| {
                b.iter(|| generate_all_contours(black_box(data), width, height, black_box(&config)));
            },
        );
    }

    group.finish();
}

fn bench_draw_contours(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_contours");
    group.sample_size(20);

    let (width, height) = (97, 97);
    let config = bathymetry_config();
    let data = generate_shelf_field(width, height);
    let contours: Vec<_> = generate_all_contours(&data, width, height, &config)
        .iter()
        .map(|c| c.map_points(|p| Point::new(p.x * 10.0, p.y * 10.0)))
        .collect();
    let clip = PixelRect::new(0.0, 0.0, 960.0, 960.0);

    group.bench_function("960x960", |b| {
        b.iter(|| {
            let mut pixmap = Pixmap::new(960, 960).unwrap();
            draw_contours(&mut pixmap, black_box(&contours), &config, &clip, None);
            pixmap
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_march_squares,
    bench_connect_segments,
    bench_generate_all_contours,
    bench_draw_contours,
);

criterion_main!(benches);
