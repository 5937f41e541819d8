//! Level planning and the high-level generator.
//!
//! A [`LevelPlan`] fixes the level geometry for a tier: total distance,
//! segment count and where the first segment starts. [`LevelGenerator`] then
//! walks the segments left to right, resolving parameters from the
//! [`ProgressionCurve`] and filling each segment through a
//! [`SegmentGenerator`] that shares one [`SpatialOverlapGuard`] for the whole
//! pass. The finish marker always lands at the tier's total distance, however
//! many placements were rejected.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LevelConfig;
use crate::entity::{EntityKind, EntityRequest, FinishMarker};
use crate::error::Result;
use crate::generation::catalog::EntityCatalog;
use crate::generation::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::generation::guard::SpatialOverlapGuard;
use crate::generation::ledger::OccupancyLedger;
use crate::generation::progression::ProgressionCurve;
use crate::generation::segment::{Segment, SegmentGenerator};
use crate::tier::DifficultyTier;

/// Counters collected over a generation pass.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Placements attempted, hazards included.
    pub requested: usize,
    /// Requests emitted, hazards included.
    pub placed: usize,
    pub hazards: usize,
    /// Dropped because every candidate overlapped.
    pub skipped_exhausted: usize,
    /// Dropped because the catalog had no matching entry.
    pub skipped_missing: usize,
}

impl GenerationStats {
    pub fn skipped(&self) -> usize {
        self.skipped_exhausted + self.skipped_missing
    }
}

/// Geometry of one level: how long it is and how it is sliced.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPlan {
    pub tier: DifficultyTier,
    pub total_distance: f32,
    pub segment_length: f32,
    pub segment_count: usize,
    /// X at which the first segment starts.
    pub start_x: f32,
}

impl LevelPlan {
    /// Plans a level for `tier`, starting `config.start_offset` past the host's scroll reference.
    pub fn new(tier: DifficultyTier, config: &LevelConfig, origin_x: f32) -> Self {
        debug_assert!(config.segment_length > 0.0, "segment_length must be > 0");
        let total_distance = tier.total_distance();
        let segment_count = (total_distance / config.segment_length).ceil().max(0.0) as usize;
        Self {
            tier,
            total_distance,
            segment_length: config.segment_length,
            segment_count,
            start_x: origin_x + config.start_offset,
        }
    }

    /// Normalized progress at the start of segment `index`.
    pub fn progress(&self, index: usize) -> f32 {
        if self.segment_count == 0 {
            return 0.0;
        }
        index as f32 / self.segment_count as f32
    }

    /// Resolves segment `index`, scaling hazards by the tier's spawn rate.
    pub fn segment(&self, index: usize, curve: &ProgressionCurve) -> Segment {
        let progress = self.progress(index);
        Segment {
            index,
            start_x: self.start_x + index as f32 * self.segment_length,
            progress,
            params: curve
                .params_at(progress)
                .scale_hazards(self.tier.spawn_rate_multiplier()),
        }
    }

    pub fn segments<'c>(&'c self, curve: &'c ProgressionCurve) -> impl Iterator<Item = Segment> + 'c {
        (0..self.segment_count).map(move |i| self.segment(i, curve))
    }

    pub fn finish_marker(&self, score_requirement: u32) -> FinishMarker {
        FinishMarker {
            x: self.total_distance,
            score_requirement,
        }
    }
}

/// Complete output of a generation pass.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub plan: LevelPlan,
    /// Placement requests in generation order.
    pub requests: Vec<EntityRequest>,
    pub finish: FinishMarker,
    pub stats: GenerationStats,
}

impl LevelLayout {
    pub fn requests_in_segment(&self, segment: usize) -> impl Iterator<Item = &EntityRequest> + '_ {
        self.requests.iter().filter(move |r| r.segment == segment)
    }

    pub fn count_where(&self, mut predicate: impl FnMut(EntityKind) -> bool) -> usize {
        self.requests.iter().filter(|r| predicate(r.kind)).count()
    }
}

/// Generator bound to a validated configuration, a curve and a catalog.
pub struct LevelGenerator<'a> {
    /// Generation configuration applied to every run.
    pub config: LevelConfig,
    /// Difficulty curve consulted per segment.
    pub curve: &'a ProgressionCurve,
    /// Catalog resolving rolls to concrete kinds.
    pub catalog: &'a EntityCatalog,
}

impl<'a> LevelGenerator<'a> {
    pub fn try_new(
        config: LevelConfig,
        curve: &'a ProgressionCurve,
        catalog: &'a EntityCatalog,
    ) -> Result<Self> {
        config.validate()?;
        curve.base.validate()?;
        Ok(Self {
            config,
            curve,
            catalog,
        })
    }

    pub fn new(config: LevelConfig, curve: &'a ProgressionCurve, catalog: &'a EntityCatalog) -> Self {
        debug_assert!(
            !config.lane_heights.is_empty(),
            "lane_heights must not be empty"
        );
        debug_assert!(config.segment_length > 0.0, "segment_length must be > 0");
        debug_assert!(
            config.fruit_attempts > 0 && config.obstacle_attempts > 0,
            "attempt budgets must be > 0"
        );

        Self {
            config,
            curve,
            catalog,
        }
    }

    /// Generates a level with a fresh ledger.
    pub fn generate(&self, tier: DifficultyTier, origin_x: f32, rng: &mut impl RngCore) -> LevelLayout {
        let ledger = OccupancyLedger::from_config(&self.config);
        run_generation(&self.config, self.curve, self.catalog, ledger, tier, origin_x, rng, &mut ())
    }

    pub fn generate_with_events(
        &self,
        tier: DifficultyTier,
        origin_x: f32,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> LevelLayout {
        let ledger = OccupancyLedger::from_config(&self.config);
        run_generation(&self.config, self.curve, self.catalog, ledger, tier, origin_x, rng, sink)
    }
}

/// Validates `config` and runs a full generation pass over `ledger`.
///
/// Configuration problems are the only failure; skipped placements are
/// reported in [`LevelLayout::stats`].
#[allow(clippy::too_many_arguments)]
pub fn generate_level<R: RngCore>(
    config: &LevelConfig,
    curve: &ProgressionCurve,
    catalog: &EntityCatalog,
    ledger: OccupancyLedger,
    tier: DifficultyTier,
    origin_x: f32,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<LevelLayout> {
    config.validate()?;
    curve.base.validate()?;
    let layout = if let Some(s) = sink {
        run_generation(config, curve, catalog, ledger, tier, origin_x, rng, s)
    } else {
        run_generation(config, curve, catalog, ledger, tier, origin_x, rng, &mut ())
    };
    Ok(layout)
}

#[allow(clippy::too_many_arguments)]
fn run_generation<R: RngCore>(
    config: &LevelConfig,
    curve: &ProgressionCurve,
    catalog: &EntityCatalog,
    ledger: OccupancyLedger,
    tier: DifficultyTier,
    origin_x: f32,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> LevelLayout {
    let plan = LevelPlan::new(tier, config, origin_x);

    if sink.wants(GenerationEventKind::RunStarted) {
        sink.send(GenerationEvent::RunStarted {
            config: config.clone(),
            tier,
            total_distance: plan.total_distance,
            segment_count: plan.segment_count,
        });
    }

    if !catalog.has_fruit() {
        warn_sink(sink, "catalog", "Catalog has no fruit; fruit placements will be skipped");
    }
    if !catalog.has_obstacles() {
        warn_sink(
            sink,
            "catalog",
            "Catalog has no obstacles; obstacle placements will be skipped",
        );
    }

    let mut guard = SpatialOverlapGuard::with_ledger(ledger, config);
    let segments = SegmentGenerator::new(config, catalog);

    let mut requests: Vec<EntityRequest> = Vec::new();
    let mut stats = GenerationStats::default();

    for segment in plan.segments(curve) {
        debug!(
            "Segment {}: x={:.1} progress={:.3} fruits={} obstacles={} thunder={:.1}%.",
            segment.index,
            segment.start_x,
            segment.progress,
            segment.params.fruits_per_segment,
            segment.params.obstacles_per_segment,
            segment.params.thunder_cloud_chance,
        );
        if sink.wants(GenerationEventKind::SegmentStarted) {
            sink.send(GenerationEvent::SegmentStarted {
                index: segment.index,
                start_x: segment.start_x,
                progress: segment.progress,
                params: segment.params,
            });
        }

        let report = segments.generate(&segment, &mut guard, rng, sink);
        stats.requested += report.attempted;
        stats.placed += report.requests.len();
        stats.hazards += report.hazards;
        stats.skipped_exhausted += report.exhausted;
        stats.skipped_missing += report.missing;
        requests.extend(report.requests);
    }

    let finish = plan.finish_marker(config.score_requirement);
    if sink.wants(GenerationEventKind::FinishPlaced) {
        sink.send(GenerationEvent::FinishPlaced { marker: finish });
    }

    info!(
        "Level generated: {} | distance {} | {} segments | {} placements ({} skipped).",
        tier,
        plan.total_distance,
        plan.segment_count,
        stats.placed,
        stats.skipped(),
    );

    if sink.wants(GenerationEventKind::RunFinished) {
        sink.send(GenerationEvent::RunFinished { stats });
    }

    LevelLayout {
        plan,
        requests,
        finish,
        stats,
    }
}

fn warn_sink(sink: &mut dyn EventSink, context: &str, message: &str) {
    warn!("{message}.");
    if sink.wants(GenerationEventKind::Warning) {
        sink.send(GenerationEvent::Warning {
            context: context.into(),
            message: message.into(),
        });
    }
}
