mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lane_runner::prelude::{
    DifficultyTier, EntityCatalog, HistoryBounds, LevelConfig, LevelGenerator, ProgressionCurve,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_tier(c: &mut Criterion, bench_name: &str, tier: DifficultyTier, config: LevelConfig) {
    let curve = ProgressionCurve::from_config(&config);
    let catalog = EntityCatalog::standard();
    let generator = LevelGenerator::new(config, &curve, &catalog);

    let mut group = c.benchmark_group(bench_name);

    // Preview a run to set throughput in "placements per iteration".
    let mut rng_preview = StdRng::seed_from_u64(0xD3ADB33F);
    let preview = generator.generate(tier, 0.0, &mut rng_preview);
    group.throughput(common::elements_throughput(preview.requests.len()));

    group.bench_function("generate", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(12345),
            |mut rng| {
                let layout = generator.generate(tier, 0.0, &mut rng);
                black_box(layout.stats);
                black_box(layout.requests.len());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

pub fn generation_benches(c: &mut Criterion) {
    for tier in DifficultyTier::ALL {
        let name = format!("generation/{}", tier.name().to_lowercase());
        bench_tier(c, &name, tier, LevelConfig::default());
    }

    // Short segments pack more placements per unit of distance.
    bench_tier(
        c,
        "generation/easy/dense",
        DifficultyTier::Easy,
        LevelConfig::default().with_segment_length(10.0),
    );

    // Larger histories make every overlap query scan more entries.
    bench_tier(
        c,
        "generation/normal/deep_ledger",
        DifficultyTier::Normal,
        LevelConfig::default()
            .with_position_history(HistoryBounds::new(200, 100))
            .with_building_history(HistoryBounds::new(150, 50)),
    );
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = generation_benches
}
criterion_main!(benches);
