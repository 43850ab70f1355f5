//! Benchmarks for point generation and per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use starfield::frame;
use starfield::patterns::{self, GeneratedPoints, PatternKind};
use starfield::scene::{Scene, VisualBackend};
use starfield::Params;

struct NullBackend;

impl VisualBackend for NullBackend {
    type Handle = ();

    fn create(&mut self, _kind: PatternKind, _points: &GeneratedPoints) -> Self::Handle {}

    fn write_positions(&mut self, _handle: &mut (), _positions: &[f32]) {}

    fn write_colors(&mut self, _handle: &mut (), _colors: &[f32]) {}
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [10_000u32, 100_000] {
        let mut params = Params::default();
        params.global.point_count = count;
        params.galaxy.count = count;

        for kind in PatternKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.name(), count), &params, |b, params| {
                let mut rng = SmallRng::seed_from_u64(42);
                b.iter(|| black_box(patterns::generate(kind, params, &mut rng)))
            });
        }
    }

    group.finish();
}

fn bench_wave_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("wave_frame");

    for count in [10_000u32, 100_000] {
        let mut params = Params::default();
        params.global.point_count = count;
        let mut rng = SmallRng::seed_from_u64(7);
        let mut scene = Scene::new();
        scene.set_active_pattern(PatternKind::Wave, &params, &mut rng, &mut NullBackend);

        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            let mut elapsed = 0.0f32;
            b.iter(|| {
                elapsed += 1.0 / 60.0;
                black_box(frame::advance(&mut scene, &params, elapsed))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_wave_frame);
criterion_main!(benches);
