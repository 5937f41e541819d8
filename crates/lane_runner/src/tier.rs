//! Difficulty tiers selected by the player and persisted by the host.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Named difficulty preset controlling level length and hazard scaling.
///
/// Easy levels are the longest; the tier also carries the timer, health and
/// spawn-rate presets the host applies to the rest of the game.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DifficultyTier {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Normal,
        DifficultyTier::Hard,
    ];

    /// Resolve a persisted tier preference. Unknown values fall back to [`DifficultyTier::Normal`].
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => DifficultyTier::Easy,
            2 => DifficultyTier::Hard,
            _ => DifficultyTier::Normal,
        }
    }

    /// Index stored by the host's settings store.
    pub fn index(self) -> i32 {
        match self {
            DifficultyTier::Easy => 0,
            DifficultyTier::Normal => 1,
            DifficultyTier::Hard => 2,
        }
    }

    /// Total level length in world units. Strictly decreasing from Easy to Hard.
    pub fn total_distance(self) -> f32 {
        match self {
            DifficultyTier::Easy => 900.0,
            DifficultyTier::Normal => 540.0,
            DifficultyTier::Hard => 360.0,
        }
    }

    pub fn time_limit_secs(self) -> f32 {
        match self {
            DifficultyTier::Easy => 600.0,
            DifficultyTier::Normal => 360.0,
            DifficultyTier::Hard => 240.0,
        }
    }

    pub fn player_health(self) -> u32 {
        match self {
            DifficultyTier::Easy => 5,
            DifficultyTier::Normal => 3,
            DifficultyTier::Hard => 2,
        }
    }

    /// Scale applied to hazard frequency during generation.
    pub fn spawn_rate_multiplier(self) -> f32 {
        match self {
            DifficultyTier::Easy => 0.8,
            DifficultyTier::Normal => 1.0,
            DifficultyTier::Hard => 1.3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DifficultyTier::Easy => "EASY",
            DifficultyTier::Normal => "NORMAL",
            DifficultyTier::Hard => "HARD",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DifficultyTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "0" => Ok(DifficultyTier::Easy),
            "normal" | "1" => Ok(DifficultyTier::Normal),
            "hard" | "2" => Ok(DifficultyTier::Hard),
            _ => Err(Error::UnknownTier(s.to_owned())),
        }
    }
}
