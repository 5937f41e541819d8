//! Entity vocabulary and the placement requests handed to the host.
use std::fmt;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Score band a fruit belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FruitTier {
    Regular,
    Golden,
    Heart,
    Rotten,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FruitKind {
    Apple,
    Grape,
    Watermelon,
    Dragonfruit,
    GoldApple,
    GoldGrape,
    GoldWatermelon,
    GoldDragonfruit,
    /// Heals one point of health, or scores when health is full.
    HeartFruit,
    /// Damages the player like an obstacle.
    RottenApple,
}

impl FruitKind {
    pub const ALL: [FruitKind; 10] = [
        FruitKind::Apple,
        FruitKind::Grape,
        FruitKind::Watermelon,
        FruitKind::Dragonfruit,
        FruitKind::GoldApple,
        FruitKind::GoldGrape,
        FruitKind::GoldWatermelon,
        FruitKind::GoldDragonfruit,
        FruitKind::HeartFruit,
        FruitKind::RottenApple,
    ];

    pub fn tier(self) -> FruitTier {
        match self {
            FruitKind::Apple
            | FruitKind::Grape
            | FruitKind::Watermelon
            | FruitKind::Dragonfruit => FruitTier::Regular,
            FruitKind::GoldApple
            | FruitKind::GoldGrape
            | FruitKind::GoldWatermelon
            | FruitKind::GoldDragonfruit => FruitTier::Golden,
            FruitKind::HeartFruit => FruitTier::Heart,
            FruitKind::RottenApple => FruitTier::Rotten,
        }
    }

    /// Points awarded on collection. Golden variants score double.
    pub fn score_value(self) -> u32 {
        match self {
            FruitKind::Apple | FruitKind::Grape => 10,
            FruitKind::Watermelon | FruitKind::Dragonfruit => 20,
            FruitKind::GoldApple | FruitKind::GoldGrape => 20,
            FruitKind::GoldWatermelon | FruitKind::GoldDragonfruit => 40,
            FruitKind::HeartFruit => 50,
            FruitKind::RottenApple => 0,
        }
    }

    pub fn is_harmful(self) -> bool {
        self.tier() == FruitTier::Rotten
    }

    pub fn name(self) -> &'static str {
        match self {
            FruitKind::Apple => "apple",
            FruitKind::Grape => "grape",
            FruitKind::Watermelon => "watermelon",
            FruitKind::Dragonfruit => "dragonfruit",
            FruitKind::GoldApple => "gold apple",
            FruitKind::GoldGrape => "gold grape",
            FruitKind::GoldWatermelon => "gold watermelon",
            FruitKind::GoldDragonfruit => "gold dragonfruit",
            FruitKind::HeartFruit => "heart fruit",
            FruitKind::RottenApple => "rotten apple",
        }
    }
}

/// Obstacle kinds: a ground-anchored building, a lane-tracking missile and an
/// arcing cannonball launched from below the lowest lane.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Building,
    Missile,
    Cannonball,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Building,
        ObstacleKind::Missile,
        ObstacleKind::Cannonball,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObstacleKind::Building => "building",
            ObstacleKind::Missile => "missile",
            ObstacleKind::Cannonball => "cannonball",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HazardKind {
    ThunderCloud,
}

/// Anything the generator can ask the host to instantiate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Fruit(FruitKind),
    Obstacle(ObstacleKind),
    Hazard(HazardKind),
}

impl EntityKind {
    pub fn is_building(self) -> bool {
        self == EntityKind::Obstacle(ObstacleKind::Building)
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Fruit(kind) => kind.name(),
            EntityKind::Obstacle(kind) => kind.name(),
            EntityKind::Hazard(HazardKind::ThunderCloud) => "thunder cloud",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<FruitKind> for EntityKind {
    fn from(value: FruitKind) -> Self {
        EntityKind::Fruit(value)
    }
}

impl From<ObstacleKind> for EntityKind {
    fn from(value: ObstacleKind) -> Self {
        EntityKind::Obstacle(value)
    }
}

/// A committed placement: what to spawn and where.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityRequest {
    pub kind: EntityKind,
    /// World position; `x` is distance along the track.
    pub position: Vec2,
    /// Index of the segment that produced this request.
    pub segment: usize,
}

impl EntityRequest {
    pub fn new(kind: impl Into<EntityKind>, position: Vec2, segment: usize) -> Self {
        Self {
            kind: kind.into(),
            position,
            segment,
        }
    }
}

/// End-of-level marker and the score needed to clear the level when it is reached.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishMarker {
    pub x: f32,
    pub score_requirement: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_fruit_scores_double_regular() {
        let pairs = [
            (FruitKind::Apple, FruitKind::GoldApple),
            (FruitKind::Grape, FruitKind::GoldGrape),
            (FruitKind::Watermelon, FruitKind::GoldWatermelon),
            (FruitKind::Dragonfruit, FruitKind::GoldDragonfruit),
        ];
        for (regular, golden) in pairs {
            assert_eq!(golden.score_value(), regular.score_value() * 2);
            assert_eq!(regular.tier(), FruitTier::Regular);
            assert_eq!(golden.tier(), FruitTier::Golden);
        }
    }

    #[test]
    fn only_rotten_fruit_is_harmful() {
        let harmful: Vec<_> = FruitKind::ALL
            .iter()
            .filter(|k| k.is_harmful())
            .collect();
        assert_eq!(harmful, vec![&FruitKind::RottenApple]);
        assert_eq!(FruitKind::RottenApple.score_value(), 0);
    }

    #[test]
    fn entity_kind_reports_building() {
        assert!(EntityKind::from(ObstacleKind::Building).is_building());
        assert!(!EntityKind::from(ObstacleKind::Missile).is_building());
        assert!(!EntityKind::Fruit(FruitKind::Apple).is_building());
    }

    #[test]
    fn display_uses_readable_names() {
        assert_eq!(EntityKind::Hazard(HazardKind::ThunderCloud).to_string(), "thunder cloud");
        assert_eq!(EntityKind::from(FruitKind::GoldGrape).to_string(), "gold grape");
    }
}
