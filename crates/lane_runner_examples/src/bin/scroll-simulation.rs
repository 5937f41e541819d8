use lane_runner::prelude::*;
use lane_runner_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

const DT: f32 = 1.0 / 60.0;
const PLAYER_X: f32 = 0.0;
const HIT_RADIUS: f32 = 0.8;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let tier = DifficultyTier::Normal;
    let config = LevelConfig::default();
    let curve = ProgressionCurve::from_config(&config);
    let catalog = EntityCatalog::standard();
    let generator = LevelGenerator::try_new(config.clone(), &curve, &catalog)?;

    let mut rng = StdRng::seed_from_u64(7);
    let layout = generator.generate(tier, PLAYER_X, &mut rng);

    let mut track = Track::from_layout(&layout, ScrollState::default().with_speed(ScrollSpeed::Fast))
        .with_camera_x(PLAYER_X);

    let mut player_y = config.lane_heights[config.lane_heights.len() / 2];
    let mut score = 0u32;
    let mut health = tier.player_health();

    let outcome = loop {
        // Steer toward the next collectible fruit ahead.
        if let Some(target) = track
            .entities()
            .iter()
            .filter(|e| e.position.x > PLAYER_X)
            .filter(|e| matches!(e.kind, EntityKind::Fruit(f) if !f.is_harmful()))
            .min_by(|a, b| a.position.x.total_cmp(&b.position.x))
        {
            player_y = nearest_lane(&config.lane_heights, target.position.y);
        }

        let scroll = track.scroll;
        for entity in track.entities() {
            let next_x = scroll.step(entity.position.x, DT);
            let crosses = entity.position.x > PLAYER_X && next_x <= PLAYER_X;
            if !crosses || (entity.position.y - player_y).abs() > HIT_RADIUS {
                continue;
            }
            match entity.kind {
                EntityKind::Fruit(f) if f.is_harmful() => health = health.saturating_sub(1),
                EntityKind::Fruit(f) => score += f.score_value(),
                EntityKind::Obstacle(_) | EntityKind::Hazard(_) => {
                    health = health.saturating_sub(1)
                }
            }
            debug!("t={:.2}s hit {} (score {score}, health {health}).", track.elapsed(), entity.kind);
        }

        track.tick(DT);

        if health == 0 || track.elapsed() > tier.time_limit_secs() {
            break LevelOutcome::Failed;
        }
        if let Some(outcome) = track.outcome(PLAYER_X, score) {
            break outcome;
        }
    };

    info!(
        "{tier}: {:?} after {:.1}s with score {score}/{} and health {health}.",
        outcome,
        track.elapsed(),
        layout.finish.score_requirement
    );
    Ok(())
}

fn nearest_lane(lanes: &[f32], y: f32) -> f32 {
    lanes
        .iter()
        .copied()
        .min_by(|a, b| (a - y).abs().total_cmp(&(b - y).abs()))
        .unwrap_or(y)
}
