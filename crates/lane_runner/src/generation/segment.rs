//! Per-segment placement: fruits, then obstacles, then hazards.
//!
//! The order is part of the contract. Earlier placements claim the ledger
//! first and can cause later candidates in the same segment to be rejected,
//! so reordering changes the generated level.
use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LevelConfig;
use crate::entity::{EntityKind, EntityRequest, HazardKind, ObstacleKind};
use crate::generation::catalog::EntityCatalog;
use crate::generation::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::generation::guard::{OccupancyClass, SpatialOverlapGuard};
use crate::generation::progression::ProgressParams;
use crate::random;

/// Why a placement was dropped. Neither reason aborts generation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Every candidate height within the attempt budget overlapped.
    PlacementExhausted,
    /// The catalog had no entry for the rolled category.
    MissingCatalogEntry,
}

/// One horizontal slice of the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_x: f32,
    pub progress: f32,
    pub params: ProgressParams,
}

/// What a single segment produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentReport {
    /// Committed requests in generation order.
    pub requests: Vec<EntityRequest>,
    /// Placements tried, including hazards that passed their roll.
    pub attempted: usize,
    pub hazards: usize,
    pub exhausted: usize,
    pub missing: usize,
}

/// Generates the requests of one segment against a shared overlap guard.
pub struct SegmentGenerator<'a> {
    config: &'a LevelConfig,
    catalog: &'a EntityCatalog,
}

impl<'a> SegmentGenerator<'a> {
    pub fn new(config: &'a LevelConfig, catalog: &'a EntityCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn generate<R: RngCore>(
        &self,
        segment: &Segment,
        guard: &mut SpatialOverlapGuard,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> SegmentReport {
        let mut report = SegmentReport::default();
        self.place_fruits(segment, guard, rng, sink, &mut report);
        self.place_obstacles(segment, guard, rng, sink, &mut report);
        self.place_hazards(segment, rng, sink, &mut report);
        report
    }

    fn place_fruits<R: RngCore>(
        &self,
        segment: &Segment,
        guard: &mut SpatialOverlapGuard,
        rng: &mut R,
        sink: &mut dyn EventSink,
        report: &mut SegmentReport,
    ) {
        let count = segment.params.fruits_per_segment;
        let (jitter_min, jitter_max) = self.config.fruit_jitter;
        for i in 0..count {
            let x = segment.start_x
                + (i as f32 / count as f32) * self.config.segment_length
                + random::range(rng, jitter_min, jitter_max);
            report.attempted += 1;

            let roll = random::range(rng, 0.0, 100.0);
            let Some(kind) =
                self.catalog
                    .pick_fruit_kind(segment.progress, roll, &segment.params, rng)
            else {
                skip(segment, None, x, SkipReason::MissingCatalogEntry, sink, report);
                continue;
            };

            let placed = guard.test_and_reserve(
                x,
                OccupancyClass::Standard,
                self.config.fruit_attempts,
                || self.fruit_height(&mut *rng),
            );
            commit_or_skip(segment, kind.into(), x, placed, sink, report);
        }
    }

    fn place_obstacles<R: RngCore>(
        &self,
        segment: &Segment,
        guard: &mut SpatialOverlapGuard,
        rng: &mut R,
        sink: &mut dyn EventSink,
        report: &mut SegmentReport,
    ) {
        let params = &segment.params;
        let length = self.config.segment_length;

        let buildings = params.buildings_per_segment();
        let spacing = length / buildings.max(1) as f32;
        let (jitter_min, jitter_max) = self.config.building_jitter;
        for i in 0..buildings {
            let x = segment.start_x + i as f32 * spacing + random::range(rng, jitter_min, jitter_max);
            report.attempted += 1;
            if !self.catalog.has_obstacle(ObstacleKind::Building) {
                skip(
                    segment,
                    Some(ObstacleKind::Building.into()),
                    x,
                    SkipReason::MissingCatalogEntry,
                    sink,
                    report,
                );
                continue;
            }
            self.place_obstacle(segment, ObstacleKind::Building, x, guard, rng, sink, report);
        }

        let airborne = params.obstacles_per_segment - buildings;
        let (lead, trail) = self.config.airborne_window;
        let weights = params.obstacle_weights().airborne();
        for _ in 0..airborne {
            let x = segment.start_x + random::range(rng, lead, length - trail);
            report.attempted += 1;
            let roll = random::rand01(rng);
            let Some(kind) = self.catalog.pick_obstacle_kind(roll, weights) else {
                skip(segment, None, x, SkipReason::MissingCatalogEntry, sink, report);
                continue;
            };
            self.place_obstacle(segment, kind, x, guard, rng, sink, report);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn place_obstacle<R: RngCore>(
        &self,
        segment: &Segment,
        kind: ObstacleKind,
        x: f32,
        guard: &mut SpatialOverlapGuard,
        rng: &mut R,
        sink: &mut dyn EventSink,
        report: &mut SegmentReport,
    ) {
        let class = match kind {
            ObstacleKind::Building => OccupancyClass::Building,
            ObstacleKind::Missile | ObstacleKind::Cannonball => OccupancyClass::Standard,
        };
        let placed = guard.test_and_reserve(x, class, self.config.obstacle_attempts, || {
            self.obstacle_height(kind, &mut *rng)
        });
        commit_or_skip(segment, kind.into(), x, placed, sink, report);
    }

    fn place_hazards<R: RngCore>(
        &self,
        segment: &Segment,
        rng: &mut R,
        sink: &mut dyn EventSink,
        report: &mut SegmentReport,
    ) {
        let (lead, trail) = self.config.hazard_window;
        let y = self.config.hazard_height();
        for _ in 0..self.config.max_thunder_clouds_per_segment {
            if !random::percent(rng, segment.params.thunder_cloud_chance) {
                continue;
            }
            let x = segment.start_x + random::range(rng, lead, self.config.segment_length - trail);
            report.attempted += 1;
            report.hazards += 1;
            let request = EntityRequest::new(
                EntityKind::Hazard(HazardKind::ThunderCloud),
                Vec2::new(x, y),
                segment.index,
            );
            emit_placement(request, sink);
            report.requests.push(request);
        }
    }

    /// Snaps to an air lane most of the time, otherwise picks a free height.
    fn fruit_height(&self, rng: &mut dyn RngCore) -> f32 {
        let lanes = &self.config.lane_heights;
        if random::rand01(rng) < self.config.lane_snap_chance {
            let lane = if lanes.len() > 1 {
                random::index_in(rng, 1, lanes.len())
            } else {
                0
            };
            lanes[lane]
        } else {
            let half = self.config.spawn_range_y * 0.5;
            random::range(rng, -half, half)
        }
    }

    fn obstacle_height(&self, kind: ObstacleKind, rng: &mut dyn RngCore) -> f32 {
        match kind {
            ObstacleKind::Building => self.config.ground_level,
            ObstacleKind::Missile => {
                let lanes = &self.config.lane_heights;
                lanes[random::index(rng, lanes.len())]
            }
            ObstacleKind::Cannonball => self.config.cannonball_height,
        }
    }
}

fn commit_or_skip(
    segment: &Segment,
    kind: EntityKind,
    x: f32,
    placed: Option<Vec2>,
    sink: &mut dyn EventSink,
    report: &mut SegmentReport,
) {
    match placed {
        Some(position) => {
            let request = EntityRequest::new(kind, position, segment.index);
            emit_placement(request, sink);
            report.requests.push(request);
        }
        None => skip(
            segment,
            Some(kind),
            x,
            SkipReason::PlacementExhausted,
            sink,
            report,
        ),
    }
}

fn emit_placement(request: EntityRequest, sink: &mut dyn EventSink) {
    if sink.wants(GenerationEventKind::PlacementMade) {
        sink.send(GenerationEvent::PlacementMade { request });
    }
}

fn skip(
    segment: &Segment,
    kind: Option<EntityKind>,
    x: f32,
    reason: SkipReason,
    sink: &mut dyn EventSink,
    report: &mut SegmentReport,
) {
    match reason {
        SkipReason::PlacementExhausted => report.exhausted += 1,
        SkipReason::MissingCatalogEntry => report.missing += 1,
    }
    debug!(
        "Segment {}: skipped {} at x={:.2} ({:?}).",
        segment.index,
        kind.map_or("entity", EntityKind::name),
        x,
        reason
    );
    if sink.wants(GenerationEventKind::PlacementSkipped) {
        sink.send(GenerationEvent::PlacementSkipped {
            segment: segment.index,
            kind,
            x,
            reason,
        });
    }
}
