mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lane_runner::prelude::{EntityCatalog, ProgressionCurve};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const ROLLS: usize = 1024;

fn unit(rng: &mut StdRng) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

fn catalog_fruit_benches(c: &mut Criterion) {
    let catalog = EntityCatalog::standard();
    let curve = ProgressionCurve::new();
    let mut group = c.benchmark_group("catalog/pick_fruit_kind");
    group.throughput(common::elements_throughput(ROLLS));

    for &progress in &[0.1f32, 0.45, 0.9] {
        let params = curve.params_at(progress);
        group.bench_with_input(BenchmarkId::from_parameter(progress), &progress, |b, &p| {
            let mut rng = StdRng::seed_from_u64(0xC0FFEE);
            b.iter(|| {
                for _ in 0..ROLLS {
                    let roll = unit(&mut rng) * 100.0;
                    black_box(catalog.pick_fruit_kind(p, roll, &params, &mut rng));
                }
            });
        });
    }

    group.finish();
}

fn catalog_obstacle_benches(c: &mut Criterion) {
    let catalog = EntityCatalog::standard();
    let curve = ProgressionCurve::new();
    let weights = curve.params_at(0.9).obstacle_weights();
    let mut group = c.benchmark_group("catalog/pick_obstacle_kind");
    group.throughput(common::elements_throughput(ROLLS));

    group.bench_function("full_weights", |b| {
        let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
        b.iter(|| {
            for _ in 0..ROLLS {
                black_box(catalog.pick_obstacle_kind(unit(&mut rng), weights));
            }
        });
    });

    group.bench_function("airborne_weights", |b| {
        let mut rng = StdRng::seed_from_u64(0xBADC0DE);
        let airborne = weights.airborne();
        b.iter(|| {
            for _ in 0..ROLLS {
                black_box(catalog.pick_obstacle_kind(unit(&mut rng), airborne));
            }
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = catalog_fruit_benches, catalog_obstacle_benches
}
criterion_main!(benches);
