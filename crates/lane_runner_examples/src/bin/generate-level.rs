use std::env;

use lane_runner::prelude::*;
use lane_runner_examples::{init_tracing, load_config, render_layout_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

// Usage: generate-level [tier] [seed] [config.ron]
fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = env::args().skip(1);

    let tier: DifficultyTier = match args.next() {
        Some(s) => s.parse()?,
        None => DifficultyTier::Normal,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 2025,
    };
    let config = match args.next() {
        Some(path) => load_config(path)?,
        None => LevelConfig::default(),
    };

    let curve = ProgressionCurve::from_config(&config);
    let catalog = EntityCatalog::standard();

    let mut skips = FilteredSink::new(VecSink::new(), [GenerationEventKind::PlacementSkipped]);
    let sink: &mut dyn EventSink = &mut skips;
    let mut rng = StdRng::seed_from_u64(seed);
    let layout = generate_level(
        &config,
        &curve,
        &catalog,
        OccupancyLedger::from_config(&config),
        tier,
        0.0,
        &mut rng,
        Some(sink),
    )?;

    for kind in ObstacleKind::ALL {
        info!(
            "{:>12}: {}",
            kind.name(),
            layout.count_where(|k| k == EntityKind::from(kind))
        );
    }
    info!(
        "{:>12}: {}",
        "fruit",
        layout.count_where(|k| matches!(k, EntityKind::Fruit(_)))
    );
    info!("{:>12}: {}", "hazards", layout.stats.hazards);
    let potential: u32 = layout
        .requests
        .iter()
        .filter_map(|r| match r.kind {
            EntityKind::Fruit(f) => Some(f.score_value()),
            _ => None,
        })
        .sum();
    info!(
        "Potential score {} against requirement {}; {} placements skipped.",
        potential,
        layout.finish.score_requirement,
        skips.into_inner().len()
    );

    let rc = RenderConfig::for_layout(&layout, &config, (3600, 240));
    let out = format!("generate-level-{}.png", tier.name().to_lowercase());
    render_layout_to_png(&layout, &rc, out)?;

    Ok(())
}
