//! Difficulty progression: maps normalized level progress to spawn parameters.
//!
//! The curve is piecewise with four regimes split at fixed progress
//! fractions. Each boundary belongs to the later regime, so `progress = 0.40`
//! already uses the linear ramp of [`DifficultyRegime::Full`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::error::{Error, Result};
use crate::generation::catalog::ObstacleWeights;

/// Spawn parameters active for one segment.
///
/// Chances are percentages. The fruit chances must leave room for regular
/// fruit (their sum stays at or below 100); obstacle chances are relative
/// weights and are renormalized when picking.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressParams {
    pub obstacles_per_segment: u32,
    pub fruits_per_segment: u32,
    pub building_chance: f32,
    pub missile_chance: f32,
    pub cannonball_chance: f32,
    pub golden_fruit_chance: f32,
    pub heart_fruit_chance: f32,
    pub rotten_fruit_chance: f32,
    pub thunder_cloud_chance: f32,
}

impl Default for ProgressParams {
    fn default() -> Self {
        Self {
            obstacles_per_segment: 2,
            fruits_per_segment: 3,
            building_chance: 30.0,
            missile_chance: 25.0,
            cannonball_chance: 20.0,
            golden_fruit_chance: 15.0,
            heart_fruit_chance: 5.0,
            rotten_fruit_chance: 10.0,
            thunder_cloud_chance: 0.0,
        }
    }
}

impl ProgressParams {
    /// Sets fruit and obstacle counts per segment.
    pub fn with_counts(mut self, fruits: u32, obstacles: u32) -> Self {
        self.fruits_per_segment = fruits;
        self.obstacles_per_segment = obstacles;
        self
    }

    pub fn with_obstacle_weights(mut self, building: f32, missile: f32, cannonball: f32) -> Self {
        self.building_chance = building;
        self.missile_chance = missile;
        self.cannonball_chance = cannonball;
        self
    }

    pub fn with_fruit_chances(mut self, golden: f32, heart: f32, rotten: f32) -> Self {
        self.golden_fruit_chance = golden;
        self.heart_fruit_chance = heart;
        self.rotten_fruit_chance = rotten;
        self
    }

    pub fn with_thunder_chance(mut self, chance: f32) -> Self {
        self.thunder_cloud_chance = chance;
        self
    }

    /// Share of fruit rolls left to regular fruit.
    pub fn regular_fruit_chance(&self) -> f32 {
        (100.0 - self.golden_fruit_chance - self.heart_fruit_chance - self.rotten_fruit_chance)
            .max(0.0)
    }

    pub fn obstacle_weights(&self) -> ObstacleWeights {
        ObstacleWeights::new(
            self.building_chance,
            self.missile_chance,
            self.cannonball_chance,
        )
    }

    /// Number of obstacles in a segment that are buildings, rounding half away from zero.
    pub fn buildings_per_segment(&self) -> u32 {
        let share = self.obstacles_per_segment as f32 * (self.building_chance / 100.0);
        (share.round().max(0.0) as u32).min(self.obstacles_per_segment)
    }

    /// Checks that every chance is a percentage and that the special fruit
    /// chances leave room for regular fruit.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("building_chance", self.building_chance),
            ("missile_chance", self.missile_chance),
            ("cannonball_chance", self.cannonball_chance),
            ("golden_fruit_chance", self.golden_fruit_chance),
            ("heart_fruit_chance", self.heart_fruit_chance),
            ("rotten_fruit_chance", self.rotten_fruit_chance),
            ("thunder_cloud_chance", self.thunder_cloud_chance),
        ] {
            if !(value.is_finite() && (0.0..=100.0).contains(&value)) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in [0, 100], got {value}"
                )));
            }
        }
        let special =
            self.golden_fruit_chance + self.heart_fruit_chance + self.rotten_fruit_chance;
        if special > 100.0 {
            return Err(Error::InvalidConfig(format!(
                "golden, heart and rotten fruit chances sum to {special}, above 100"
            )));
        }
        Ok(())
    }

    /// Scales the hazard chance, keeping it a valid percentage.
    pub fn scale_hazards(mut self, factor: f32) -> Self {
        self.thunder_cloud_chance = (self.thunder_cloud_chance * factor).clamp(0.0, 100.0);
        self
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyRegime {
    /// Fruit only.
    Warmup,
    /// Buildings are the only obstacle; golden fruit appears.
    Ground,
    /// Buildings and cannonballs split evenly; heart and rotten fruit appear.
    Mixed,
    /// Every obstacle and hazard is active and counts ramp with progress.
    Full,
}

/// Pure mapping from progress in `[0, 1)` to [`ProgressParams`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionCurve {
    /// Fallback parameters; also used for every segment when not progressive.
    pub base: ProgressParams,
    pub progressive: bool,
    /// Upper bounds (exclusive) of the first three regimes.
    pub breakpoints: [f32; 3],
}

impl Default for ProgressionCurve {
    fn default() -> Self {
        Self {
            base: ProgressParams::default(),
            progressive: true,
            breakpoints: [0.05, 0.20, 0.40],
        }
    }
}

impl ProgressionCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// A curve that ignores progress and always yields `params`.
    pub fn fixed(params: ProgressParams) -> Self {
        Self {
            base: params,
            progressive: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &LevelConfig) -> Self {
        Self {
            base: config.base_params,
            progressive: config.progressive_difficulty,
            ..Self::default()
        }
    }

    pub fn regime_at(&self, progress: f32) -> DifficultyRegime {
        let progress = sanitize(progress);
        let [warmup, ground, mixed] = self.breakpoints;
        if progress < warmup {
            DifficultyRegime::Warmup
        } else if progress < ground {
            DifficultyRegime::Ground
        } else if progress < mixed {
            DifficultyRegime::Mixed
        } else {
            DifficultyRegime::Full
        }
    }

    pub fn params_at(&self, progress: f32) -> ProgressParams {
        if !self.progressive {
            return self.base;
        }

        let progress = sanitize(progress);
        let mixed_end = self.breakpoints[2];
        match self.regime_at(progress) {
            DifficultyRegime::Warmup => ProgressParams {
                obstacles_per_segment: 0,
                fruits_per_segment: 4,
                golden_fruit_chance: 0.0,
                heart_fruit_chance: 0.0,
                rotten_fruit_chance: 0.0,
                thunder_cloud_chance: 0.0,
                ..self.base
            },
            DifficultyRegime::Ground => ProgressParams {
                obstacles_per_segment: 1,
                fruits_per_segment: 4,
                building_chance: 100.0,
                missile_chance: 0.0,
                cannonball_chance: 0.0,
                golden_fruit_chance: 20.0,
                heart_fruit_chance: 0.0,
                rotten_fruit_chance: 0.0,
                thunder_cloud_chance: 0.0,
            },
            DifficultyRegime::Mixed => ProgressParams {
                obstacles_per_segment: 2,
                fruits_per_segment: 4,
                building_chance: 50.0,
                missile_chance: 0.0,
                cannonball_chance: 50.0,
                golden_fruit_chance: 15.0,
                heart_fruit_chance: 5.0,
                rotten_fruit_chance: 5.0,
                thunder_cloud_chance: 0.0,
            },
            DifficultyRegime::Full => ProgressParams {
                obstacles_per_segment: round_count(2.0 + progress * 4.0),
                fruits_per_segment: round_count(3.0 + progress * 2.0),
                building_chance: 50.0,
                missile_chance: 25.0,
                cannonball_chance: 25.0,
                golden_fruit_chance: (15.0 - progress * 10.0).max(5.0),
                heart_fruit_chance: 5.0,
                rotten_fruit_chance: (10.0 + progress * 20.0).min(100.0),
                thunder_cloud_chance: ((progress - mixed_end) * 250.0).clamp(0.0, 100.0),
            },
        }
    }
}

fn sanitize(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress
    }
}

fn round_count(value: f32) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_percent(name: &str, value: f32, progress: f32) {
        assert!(
            (0.0..=100.0).contains(&value),
            "{name} = {value} out of [0, 100] at progress {progress}"
        );
    }

    #[test]
    fn curve_output_always_validates() {
        let curve = ProgressionCurve::new();
        for step in 0..=200 {
            let progress = step as f32 / 200.0;
            curve
                .params_at(progress)
                .validate()
                .unwrap_or_else(|e| panic!("progress {progress}: {e}"));
        }
        assert!(ProgressParams::default().validate().is_ok());
    }

    #[test]
    fn params_reject_out_of_range_chances() {
        assert!(ProgressParams::default()
            .with_thunder_chance(f32::NAN)
            .validate()
            .is_err());
        assert!(ProgressParams::default()
            .with_obstacle_weights(30.0, -1.0, 20.0)
            .validate()
            .is_err());
        assert!(ProgressParams::default()
            .with_fruit_chances(50.0, 25.0, 25.0)
            .validate()
            .is_ok());
        assert!(ProgressParams::default()
            .with_fruit_chances(50.0, 25.0, 26.0)
            .validate()
            .is_err());
    }

    #[test]
    fn start_of_level_is_fruit_only() {
        let params = ProgressionCurve::new().params_at(0.0);
        assert_eq!(params.obstacles_per_segment, 0);
        assert_eq!(params.fruits_per_segment, 4);
        assert_eq!(params.golden_fruit_chance, 0.0);
        assert_eq!(params.heart_fruit_chance, 0.0);
        assert_eq!(params.rotten_fruit_chance, 0.0);
        assert_eq!(params.thunder_cloud_chance, 0.0);
    }

    #[test]
    fn ground_regime_uses_buildings_only() {
        let curve = ProgressionCurve::new();
        assert_eq!(curve.regime_at(0.05), DifficultyRegime::Ground);
        let params = curve.params_at(0.1);
        assert_eq!(params.obstacles_per_segment, 1);
        assert_eq!(params.buildings_per_segment(), 1);
        assert_eq!(params.missile_chance + params.cannonball_chance, 0.0);
        assert_eq!(params.golden_fruit_chance, 20.0);
    }

    #[test]
    fn mixed_regime_splits_buildings_and_cannonballs() {
        let params = ProgressionCurve::new().params_at(0.3);
        assert_eq!(params.obstacles_per_segment, 2);
        assert_eq!(params.buildings_per_segment(), 1);
        assert_eq!(params.building_chance, params.cannonball_chance);
        assert_eq!(params.heart_fruit_chance, 5.0);
        assert_eq!(params.rotten_fruit_chance, 5.0);
    }

    #[test]
    fn boundary_at_forty_percent_uses_linear_formulas() {
        let curve = ProgressionCurve::new();
        assert_eq!(curve.regime_at(0.40), DifficultyRegime::Full);
        let params = curve.params_at(0.40);
        assert_eq!(params.obstacles_per_segment, 4);
        assert_eq!(params.fruits_per_segment, 4);
        assert_eq!(params.thunder_cloud_chance, 0.0);
        assert!(params.missile_chance > 0.0);
    }

    #[test]
    fn full_regime_ramps_with_progress() {
        let curve = ProgressionCurve::new();
        let early = curve.params_at(0.5);
        let late = curve.params_at(0.95);
        assert!(late.obstacles_per_segment >= early.obstacles_per_segment);
        assert!(late.rotten_fruit_chance > early.rotten_fruit_chance);
        assert!(late.golden_fruit_chance < early.golden_fruit_chance);
        assert!(late.thunder_cloud_chance > early.thunder_cloud_chance);
        assert_eq!(curve.params_at(1.5).golden_fruit_chance, 5.0);
    }

    #[test]
    fn params_stay_in_range_across_progress() {
        let curve = ProgressionCurve::new();
        for step in 0..1000 {
            let progress = step as f32 / 1000.0;
            let p = curve.params_at(progress);
            assert_in_percent("building", p.building_chance, progress);
            assert_in_percent("missile", p.missile_chance, progress);
            assert_in_percent("cannonball", p.cannonball_chance, progress);
            assert_in_percent("golden", p.golden_fruit_chance, progress);
            assert_in_percent("heart", p.heart_fruit_chance, progress);
            assert_in_percent("rotten", p.rotten_fruit_chance, progress);
            assert_in_percent("thunder", p.thunder_cloud_chance, progress);
            assert!(
                p.golden_fruit_chance + p.heart_fruit_chance + p.rotten_fruit_chance <= 100.0,
                "fruit chances exceed 100 at {progress}"
            );
            assert!(p.buildings_per_segment() <= p.obstacles_per_segment);
        }
    }

    #[test]
    fn fixed_curve_ignores_progress() {
        let params = ProgressParams::default().with_counts(6, 3);
        let curve = ProgressionCurve::fixed(params);
        assert_eq!(curve.params_at(0.0), params);
        assert_eq!(curve.params_at(0.9), params);
    }

    #[test]
    fn nan_progress_is_treated_as_start() {
        let curve = ProgressionCurve::new();
        assert_eq!(curve.params_at(f32::NAN), curve.params_at(0.0));
    }

    #[test]
    fn building_share_rounds_half_away_from_zero() {
        let params = ProgressParams::default()
            .with_counts(3, 5)
            .with_obstacle_weights(50.0, 25.0, 25.0);
        assert_eq!(params.buildings_per_segment(), 3);
        let params = params.with_counts(3, 2);
        assert_eq!(params.buildings_per_segment(), 1);
    }

    #[test]
    fn hazard_scaling_clamps_to_percent() {
        let params = ProgressParams::default().with_thunder_chance(90.0);
        assert_eq!(params.scale_hazards(1.3).thunder_cloud_chance, 100.0);
        assert_eq!(params.scale_hazards(0.5).thunder_cloud_chance, 45.0);
    }

    #[test]
    fn regular_chance_is_remainder() {
        let params = ProgressParams::default().with_fruit_chances(15.0, 5.0, 10.0);
        assert_eq!(params.regular_fruit_chance(), 70.0);
    }
}
