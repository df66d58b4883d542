use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use luma_reorient::capture::{Camera, CaptureConfig, MockCamera};
use luma_reorient::extraction::{LumaBuffer, PlaneExtractor};
use luma_reorient::orientation::RotationAngle;
use luma_reorient::rotation::rotate;

fn rotate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotate");

    for (width, height) in [(640u32, 480u32), (1280, 720), (1920, 1080)] {
        let luma = LumaBuffer::from_fn(width, height, |x, y| (x ^ y) as u8);
        for angle in [RotationAngle::Deg90, RotationAngle::Deg180, RotationAngle::Deg270] {
            group.bench_with_input(
                BenchmarkId::new(angle.degrees().to_string(), format!("{width}x{height}")),
                &luma,
                |b, luma| b.iter(|| rotate(black_box(luma.clone()), angle)),
            );
        }
    }

    group.finish();
}

fn extract_benchmark(c: &mut Criterion) {
    let mut camera = MockCamera::new();
    camera
        .open(&CaptureConfig {
            width: 1280,
            height: 720,
            row_padding: 64,
            ..Default::default()
        })
        .unwrap();
    let frame = camera.capture().unwrap();
    let extractor = PlaneExtractor::new();

    c.bench_function("extract_padded_1280x720", |b| {
        b.iter(|| extractor.extract(black_box(&frame)).unwrap())
    });
}

criterion_group!(benches, rotate_benchmark, extract_benchmark);
criterion_main!(benches);
