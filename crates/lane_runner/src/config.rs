//! Level generation configuration.
//!
//! [`LevelConfig`] gathers every tunable of a generation pass: lane geometry,
//! segmentation, spacing thresholds, attempt budgets, ledger bounds, jitter
//! windows and the parameters used when progressive difficulty is disabled.
//! Defaults reproduce the shipped level feel.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generation::ledger::HistoryBounds;
use crate::generation::progression::ProgressParams;

/// Lane heights shared with the runtime movement and collision lanes.
pub const DEFAULT_LANE_HEIGHTS: [f32; 5] = [-4.0, -2.0, 0.0, 2.0, 4.0];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    /// Ordered lane heights, lowest first.
    pub lane_heights: Vec<f32>,
    /// Height at which buildings are anchored.
    pub ground_level: f32,
    /// Vertical span for free (non-lane) fruit placement, centered on zero.
    pub spawn_range_y: f32,
    /// Launch height for cannonballs, below the lowest lane.
    pub cannonball_height: f32,
    /// Offset above the top lane at which hazards float.
    pub hazard_lane_offset: f32,
    /// Width of one generation segment in world units.
    pub segment_length: f32,
    /// Distance between the host scroll reference and the first segment.
    pub start_offset: f32,
    /// Minimum x distance between entities sharing a height, and between
    /// any entity and a building.
    pub min_spawn_distance: f32,
    /// Minimum x distance between two buildings.
    pub building_spacing: f32,
    /// Candidate heights tried per fruit before giving up.
    pub fruit_attempts: usize,
    /// Candidate heights tried per obstacle before giving up.
    pub obstacle_attempts: usize,
    /// Bounds of the general position history.
    pub position_history: HistoryBounds,
    /// Bounds of the building x history.
    pub building_history: HistoryBounds,
    /// Jitter added to evenly spaced fruit x positions, as `[min, max)`.
    pub fruit_jitter: (f32, f32),
    /// Jitter added to evenly spaced building x positions, as `[min, max)`.
    pub building_jitter: (f32, f32),
    /// Airborne obstacles land in `[start + lead, start + segment_length - trail)`.
    pub airborne_window: (f32, f32),
    /// Hazards land in `[start + lead, start + segment_length - trail)`.
    pub hazard_window: (f32, f32),
    /// Probability in `[0, 1]` that a fruit snaps to an air lane instead of a free height.
    pub lane_snap_chance: f32,
    /// Number of independent hazard rolls per segment.
    pub max_thunder_clouds_per_segment: usize,
    /// Recompute parameters per segment from level progress.
    pub progressive_difficulty: bool,
    /// Parameters used for every segment when progressive difficulty is off.
    pub base_params: ProgressParams,
    /// Score the player needs when reaching the finish marker.
    pub score_requirement: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            lane_heights: DEFAULT_LANE_HEIGHTS.to_vec(),
            ground_level: -4.0,
            spawn_range_y: 8.0,
            cannonball_height: -6.0,
            hazard_lane_offset: 1.2,
            segment_length: 20.0,
            start_offset: 10.0,
            min_spawn_distance: 3.0,
            building_spacing: 8.0,
            fruit_attempts: 20,
            obstacle_attempts: 15,
            position_history: HistoryBounds::new(20, 10),
            building_history: HistoryBounds::new(15, 5),
            fruit_jitter: (1.0, 3.0),
            building_jitter: (1.0, 3.0),
            airborne_window: (5.0, 2.0),
            hazard_window: (2.0, 2.0),
            lane_snap_chance: 0.7,
            max_thunder_clouds_per_segment: 2,
            progressive_difficulty: true,
            base_params: ProgressParams::default(),
            score_requirement: 100,
        }
    }
}

impl LevelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lane_heights(mut self, lane_heights: Vec<f32>) -> Self {
        self.lane_heights = lane_heights;
        self
    }

    pub fn with_ground_level(mut self, ground_level: f32) -> Self {
        self.ground_level = ground_level;
        self
    }

    pub fn with_segment_length(mut self, segment_length: f32) -> Self {
        self.segment_length = segment_length;
        self
    }

    pub fn with_start_offset(mut self, start_offset: f32) -> Self {
        self.start_offset = start_offset;
        self
    }

    /// Sets both spacing thresholds.
    pub fn with_spacing(mut self, min_spawn_distance: f32, building_spacing: f32) -> Self {
        self.min_spawn_distance = min_spawn_distance;
        self.building_spacing = building_spacing;
        self
    }

    /// Sets the fruit and obstacle attempt budgets.
    pub fn with_attempts(mut self, fruit_attempts: usize, obstacle_attempts: usize) -> Self {
        self.fruit_attempts = fruit_attempts;
        self.obstacle_attempts = obstacle_attempts;
        self
    }

    pub fn with_position_history(mut self, bounds: HistoryBounds) -> Self {
        self.position_history = bounds;
        self
    }

    pub fn with_building_history(mut self, bounds: HistoryBounds) -> Self {
        self.building_history = bounds;
        self
    }

    pub fn with_lane_snap_chance(mut self, chance: f32) -> Self {
        self.lane_snap_chance = chance;
        self
    }

    pub fn with_max_thunder_clouds(mut self, count: usize) -> Self {
        self.max_thunder_clouds_per_segment = count;
        self
    }

    /// Disables per-segment progression and uses `params` everywhere.
    pub fn with_fixed_params(mut self, params: ProgressParams) -> Self {
        self.progressive_difficulty = false;
        self.base_params = params;
        self
    }

    pub fn with_score_requirement(mut self, score: u32) -> Self {
        self.score_requirement = score;
        self
    }

    /// Height of the highest lane. Panics on an empty lane list; call [`LevelConfig::validate`] first.
    pub fn top_lane(&self) -> f32 {
        self.lane_heights[self.lane_heights.len() - 1]
    }

    /// Height at which hazards are placed.
    pub fn hazard_height(&self) -> f32 {
        self.top_lane() + self.hazard_lane_offset
    }

    /// Validates the configuration, returning an error if generation cannot proceed.
    pub fn validate(&self) -> Result<()> {
        if self.lane_heights.is_empty() {
            return Err(Error::InvalidConfig("lane_heights must not be empty".into()));
        }
        if self.lane_heights.iter().any(|h| !h.is_finite()) {
            return Err(Error::InvalidConfig(
                "lane_heights must all be finite".into(),
            ));
        }
        if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
            return Err(Error::InvalidConfig("segment_length must be > 0".into()));
        }
        for (name, value) in [
            ("ground_level", self.ground_level),
            ("cannonball_height", self.cannonball_height),
            ("hazard_lane_offset", self.hazard_lane_offset),
            ("start_offset", self.start_offset),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{name} must be finite")));
            }
        }
        for (name, value) in [
            ("spawn_range_y", self.spawn_range_y),
            ("min_spawn_distance", self.min_spawn_distance),
            ("building_spacing", self.building_spacing),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be >= 0")));
            }
        }
        if self.fruit_attempts == 0 || self.obstacle_attempts == 0 {
            return Err(Error::InvalidConfig(
                "attempt budgets must be > 0".into(),
            ));
        }
        self.position_history.validate("position_history")?;
        self.building_history.validate("building_history")?;
        for (name, (min, max)) in [
            ("fruit_jitter", self.fruit_jitter),
            ("building_jitter", self.building_jitter),
        ] {
            if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite range with 0 <= min <= max"
                )));
            }
            if max >= self.segment_length {
                return Err(Error::InvalidConfig(format!(
                    "{name} must stay below segment_length ({})",
                    self.segment_length
                )));
            }
        }
        for (name, (lead, trail)) in [
            ("airborne_window", self.airborne_window),
            ("hazard_window", self.hazard_window),
        ] {
            if !(lead.is_finite() && trail.is_finite() && lead >= 0.0 && trail >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
            if lead >= self.segment_length - trail {
                return Err(Error::InvalidConfig(format!(
                    "{name} leaves no room in a segment of length {}",
                    self.segment_length
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.lane_snap_chance) {
            return Err(Error::InvalidConfig(
                "lane_snap_chance must be in [0, 1]".into(),
            ));
        }
        self.base_params.validate()?;

        Ok(())
    }
}
