//! Occupancy ledger: the bounded history of committed placements.
//!
//! The world only scrolls one way, so positions far behind the generation
//! frontier can no longer conflict with new candidates. Each history keeps a
//! fixed number of entries and, once that is exceeded, forgets its oldest
//! batch. This is an approximation: a forgotten entry is never consulted again.
use std::collections::VecDeque;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::error::{Error, Result};

/// Capacity and eviction batch of a [`BoundedHistory`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryBounds {
    /// Maximum number of retained entries.
    pub capacity: usize,
    /// Number of oldest entries dropped once `capacity` is exceeded.
    pub evict: usize,
}

impl HistoryBounds {
    pub fn new(capacity: usize, evict: usize) -> Self {
        Self { capacity, evict }
    }

    pub(crate) fn validate(&self, name: &str) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig(format!("{name}.capacity must be > 0")));
        }
        if self.evict == 0 || self.evict > self.capacity {
            return Err(Error::InvalidConfig(format!(
                "{name}.evict must be in 1..={}",
                self.capacity
            )));
        }
        Ok(())
    }
}

/// Append-only deque that drops its oldest batch when it overflows.
#[derive(Clone, Debug)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    bounds: HistoryBounds,
}

impl<T> BoundedHistory<T> {
    pub fn new(bounds: HistoryBounds) -> Self {
        debug_assert!(bounds.capacity > 0, "capacity must be > 0");
        Self {
            entries: VecDeque::with_capacity(bounds.capacity + 1),
            bounds,
        }
    }

    /// Appends `value`, returning how many old entries were evicted.
    pub fn push(&mut self, value: T) -> usize {
        self.entries.push_back(value);
        if self.entries.len() <= self.bounds.capacity {
            return 0;
        }
        let evict = self.bounds.evict.clamp(1, self.entries.len());
        self.entries.drain(..evict);
        evict
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bounds(&self) -> HistoryBounds {
        self.bounds
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Committed placement history, split into a general view and a building-only view.
#[derive(Clone, Debug)]
pub struct OccupancyLedger {
    positions: BoundedHistory<Vec2>,
    buildings: BoundedHistory<f32>,
}

impl OccupancyLedger {
    pub fn new(position_bounds: HistoryBounds, building_bounds: HistoryBounds) -> Self {
        Self {
            positions: BoundedHistory::new(position_bounds),
            buildings: BoundedHistory::new(building_bounds),
        }
    }

    pub fn from_config(config: &LevelConfig) -> Self {
        Self::new(config.position_history, config.building_history)
    }

    /// Records a non-building placement.
    pub fn record(&mut self, position: Vec2) {
        self.positions.push(position);
    }

    /// Records a building in both views.
    pub fn record_building(&mut self, position: Vec2) {
        self.buildings.push(position.x);
        self.positions.push(position);
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.positions.iter().copied()
    }

    pub fn building_xs(&self) -> impl Iterator<Item = f32> + '_ {
        self.buildings.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }
}

impl Default for OccupancyLedger {
    fn default() -> Self {
        Self::new(HistoryBounds::new(20, 10), HistoryBounds::new(15, 5))
    }
}
