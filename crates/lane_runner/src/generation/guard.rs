//! Spatial overlap guard for candidate placements.
//!
//! Conflict rules:
//! - a [`OccupancyClass::Standard`] candidate conflicts with any recorded
//!   position at the same height within `min_spawn_distance`, and with any
//!   building within `min_spawn_distance` regardless of height;
//! - a [`OccupancyClass::Building`] candidate conflicts with any other
//!   building within `building_spacing` regardless of height, and with any
//!   recorded position at ground level within `building_spacing`.
use glam::Vec2;

use crate::config::LevelConfig;
use crate::generation::ledger::OccupancyLedger;

/// How a placement occupies the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupancyClass {
    /// Spans from the ground up through the lanes.
    Building,
    /// Occupies a single height.
    Standard,
}

#[derive(Clone, Debug)]
pub struct SpatialOverlapGuard {
    ledger: OccupancyLedger,
    min_spawn_distance: f32,
    building_spacing: f32,
    ground_level: f32,
}

impl SpatialOverlapGuard {
    pub fn new(
        ledger: OccupancyLedger,
        min_spawn_distance: f32,
        building_spacing: f32,
        ground_level: f32,
    ) -> Self {
        Self {
            ledger,
            min_spawn_distance,
            building_spacing,
            ground_level,
        }
    }

    /// Builds a guard with a fresh ledger sized from `config`.
    pub fn from_config(config: &LevelConfig) -> Self {
        Self::with_ledger(OccupancyLedger::from_config(config), config)
    }

    /// Builds a guard over an existing ledger, taking thresholds from `config`.
    pub fn with_ledger(ledger: OccupancyLedger, config: &LevelConfig) -> Self {
        Self::new(
            ledger,
            config.min_spawn_distance,
            config.building_spacing,
            config.ground_level,
        )
    }

    pub fn ledger(&self) -> &OccupancyLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> OccupancyLedger {
        self.ledger
    }

    /// Returns true when a candidate at `position` would overlap a committed placement.
    pub fn conflicts(&self, position: Vec2, class: OccupancyClass) -> bool {
        match class {
            OccupancyClass::Building => {
                let spacing = self.building_spacing;
                self.ledger
                    .building_xs()
                    .any(|bx| (bx - position.x).abs() < spacing)
                    || self.ledger.positions().any(|p| {
                        same_height(p.y, self.ground_level) && (p.x - position.x).abs() < spacing
                    })
            }
            OccupancyClass::Standard => {
                let spacing = self.min_spawn_distance;
                self.ledger
                    .positions()
                    .any(|p| same_height(p.y, position.y) && (p.x - position.x).abs() < spacing)
                    || self
                        .ledger
                        .building_xs()
                        .any(|bx| (bx - position.x).abs() < spacing)
            }
        }
    }

    /// Records a placement without checking it.
    pub fn commit(&mut self, position: Vec2, class: OccupancyClass) {
        match class {
            OccupancyClass::Building => self.ledger.record_building(position),
            OccupancyClass::Standard => self.ledger.record(position),
        }
    }

    /// Tries up to `attempts` candidate heights at `x` and commits the first free one.
    ///
    /// `candidate_y` is called once per attempt and re-rolls the height using
    /// the caller's category rule. Returns `None` when the budget runs out;
    /// the caller skips that placement.
    pub fn test_and_reserve(
        &mut self,
        x: f32,
        class: OccupancyClass,
        attempts: usize,
        mut candidate_y: impl FnMut() -> f32,
    ) -> Option<Vec2> {
        for _ in 0..attempts {
            let candidate = Vec2::new(x, candidate_y());
            if !self.conflicts(candidate, class) {
                self.commit(candidate, class);
                return Some(candidate);
            }
        }
        None
    }
}

/// Height equality with a relative tolerance, so lane values computed in
/// different ways still compare equal.
pub(crate) fn same_height(a: f32, b: f32) -> bool {
    let tolerance = (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0);
    (a - b).abs() < tolerance
}
