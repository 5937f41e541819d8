//! Runtime scroll contract for placed entities.
//!
//! Every live entity moves left by `base_speed × multiplier × dt` each tick,
//! all reading the same multiplier, so the whole track scrolls at one rate.
//! The finish marker scrolls with everything else; when it reaches the player
//! the run is settled against its score requirement.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{EntityKind, EntityRequest, FinishMarker};
use crate::generation::plan::LevelLayout;

pub const DEFAULT_BASE_SPEED: f32 = 4.0;
pub const DEFAULT_DESTROY_DISTANCE: f32 = 20.0;

/// Player-selected scroll speed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollSpeed {
    Paused,
    Slow,
    #[default]
    Normal,
    Fast,
}

impl ScrollSpeed {
    pub fn multiplier(self) -> f32 {
        match self {
            ScrollSpeed::Paused => 0.0,
            ScrollSpeed::Slow => 0.5,
            ScrollSpeed::Normal => 1.0,
            ScrollSpeed::Fast => 2.0,
        }
    }
}

/// Shared scroll rate read by every entity on the track.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    pub base_speed: f32,
    pub multiplier: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            base_speed: DEFAULT_BASE_SPEED,
            multiplier: ScrollSpeed::Normal.multiplier(),
        }
    }
}

impl ScrollState {
    pub fn new(base_speed: f32) -> Self {
        Self {
            base_speed,
            ..Default::default()
        }
    }

    pub fn with_speed(mut self, speed: ScrollSpeed) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_speed(&mut self, speed: ScrollSpeed) {
        self.multiplier = speed.multiplier();
    }

    /// Distance scrolled over `dt` seconds.
    #[inline]
    pub fn displacement(&self, dt: f32) -> f32 {
        self.base_speed * self.multiplier * dt
    }

    #[inline]
    pub fn step(&self, x: f32, dt: f32) -> f32 {
        x - self.displacement(dt)
    }
}

/// An instantiated entity on the track.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveEntity {
    pub kind: EntityKind,
    pub position: Vec2,
}

impl From<EntityRequest> for LiveEntity {
    fn from(request: EntityRequest) -> Self {
        Self {
            kind: request.kind,
            position: request.position,
        }
    }
}

/// Result of reaching the finish marker.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelOutcome {
    Complete,
    Failed,
}

impl LevelOutcome {
    /// Complete when `score` meets the marker's requirement.
    pub fn evaluate(score: u32, finish: &FinishMarker) -> Self {
        if score >= finish.score_requirement {
            LevelOutcome::Complete
        } else {
            LevelOutcome::Failed
        }
    }
}

/// Live entities plus the finish marker, all scrolled by one [`ScrollState`].
#[derive(Clone, Debug)]
pub struct Track {
    pub scroll: ScrollState,
    /// Entities further than this behind the camera are removed.
    pub destroy_distance: f32,
    camera_x: f32,
    entities: Vec<LiveEntity>,
    finish: FinishMarker,
    elapsed: f32,
}

impl Track {
    pub fn new(entities: Vec<LiveEntity>, finish: FinishMarker, scroll: ScrollState) -> Self {
        Self {
            scroll,
            destroy_distance: DEFAULT_DESTROY_DISTANCE,
            camera_x: 0.0,
            entities,
            finish,
            elapsed: 0.0,
        }
    }

    /// Instantiates every request of `layout`.
    pub fn from_layout(layout: &LevelLayout, scroll: ScrollState) -> Self {
        let entities = layout.requests.iter().copied().map(LiveEntity::from).collect();
        Self::new(entities, layout.finish, scroll)
    }

    pub fn with_camera_x(mut self, camera_x: f32) -> Self {
        self.camera_x = camera_x;
        self
    }

    pub fn entities(&self) -> &[LiveEntity] {
        &self.entities
    }

    pub fn finish(&self) -> &FinishMarker {
        &self.finish
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances every entity and the finish marker by one tick.
    ///
    /// Returns the number of entities culled behind the camera.
    pub fn tick(&mut self, dt: f32) -> usize {
        let scroll = self.scroll;
        for entity in &mut self.entities {
            entity.position.x = scroll.step(entity.position.x, dt);
        }
        self.finish.x = scroll.step(self.finish.x, dt);
        self.elapsed += dt;

        let cutoff = self.camera_x - self.destroy_distance;
        let before = self.entities.len();
        self.entities.retain(|e| e.position.x >= cutoff);
        let culled = before - self.entities.len();
        if culled > 0 {
            debug!("Culled {culled} entities behind x={cutoff:.1}.");
        }
        culled
    }

    pub fn finish_reached(&self, player_x: f32) -> bool {
        self.finish.x <= player_x
    }

    /// Settles the run once the finish marker reaches the player.
    pub fn outcome(&self, player_x: f32, score: u32) -> Option<LevelOutcome> {
        self.finish_reached(player_x)
            .then(|| LevelOutcome::evaluate(score, &self.finish))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{FruitKind, ObstacleKind};

    fn marker(x: f32) -> FinishMarker {
        FinishMarker {
            x,
            score_requirement: 100,
        }
    }

    #[test]
    fn step_scales_with_speed() {
        let normal = ScrollState::default();
        assert_eq!(normal.step(10.0, 0.5), 8.0);
        assert_eq!(normal.with_speed(ScrollSpeed::Fast).step(10.0, 0.5), 6.0);
        assert_eq!(normal.with_speed(ScrollSpeed::Slow).step(10.0, 0.5), 9.0);
        assert_eq!(normal.with_speed(ScrollSpeed::Paused).step(10.0, 0.5), 10.0);
    }

    #[test]
    fn tick_moves_everything_equally() {
        let entities = vec![
            LiveEntity {
                kind: FruitKind::Apple.into(),
                position: Vec2::new(12.0, 2.0),
            },
            LiveEntity {
                kind: ObstacleKind::Building.into(),
                position: Vec2::new(30.0, -4.0),
            },
        ];
        let mut track = Track::new(entities, marker(50.0), ScrollState::default());
        track.tick(1.0);
        let xs: Vec<f32> = track.entities().iter().map(|e| e.position.x).collect();
        assert_eq!(xs, vec![8.0, 26.0]);
        assert_eq!(track.finish().x, 46.0);
        assert_eq!(track.elapsed(), 1.0);
    }

    #[test]
    fn entities_far_behind_the_camera_are_culled() {
        let entities = vec![
            LiveEntity {
                kind: FruitKind::Grape.into(),
                position: Vec2::new(-17.0, 0.0),
            },
            LiveEntity {
                kind: FruitKind::Grape.into(),
                position: Vec2::new(-15.0, 0.0),
            },
        ];
        let mut track = Track::new(entities, marker(50.0), ScrollState::default());
        assert_eq!(track.tick(1.0), 1);
        assert_eq!(track.entities().len(), 1);
        assert_eq!(track.entities()[0].position.x, -19.0);
    }

    #[test]
    fn outcome_settles_on_reaching_the_finish() {
        let mut track = Track::new(Vec::new(), marker(8.0), ScrollState::default());
        assert_eq!(track.outcome(0.0, 500), None);
        track.tick(2.0);
        assert!(track.finish_reached(0.0));
        assert_eq!(track.outcome(0.0, 100), Some(LevelOutcome::Complete));
        assert_eq!(track.outcome(0.0, 99), Some(LevelOutcome::Failed));
    }

    #[test]
    fn paused_track_never_finishes() {
        let mut track = Track::new(
            Vec::new(),
            marker(8.0),
            ScrollState::default().with_speed(ScrollSpeed::Paused),
        );
        for _ in 0..100 {
            track.tick(0.1);
        }
        assert!(!track.finish_reached(0.0));
    }
}
