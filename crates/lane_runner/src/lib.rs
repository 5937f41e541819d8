#![forbid(unsafe_code)]
//! lane_runner: Procedural level generation for side-scrolling lane runners.
//!
//! Modules:
//! - generation: progression curve, overlap guard and ledger, entity catalog, segment and level generators, events
//! - scroll: runtime scroll contract, track ticking and level outcome
//! - tier, entity, config: difficulty presets, entity vocabulary, tunables
//!
//! Generation is synchronous and deterministic for a given seeded RNG.
pub mod config;
pub mod entity;
pub mod error;
pub mod generation;
pub mod random;
pub mod scroll;
pub mod tier;

/// Convenient re-exports for common types. Import with `use lane_runner::prelude::*;`.
pub mod prelude {
    pub use crate::config::{LevelConfig, DEFAULT_LANE_HEIGHTS};
    pub use crate::entity::{
        EntityKind, EntityRequest, FinishMarker, FruitKind, FruitTier, HazardKind, ObstacleKind,
    };
    pub use crate::error::{Error, Result};
    pub use crate::generation::catalog::{EntityCatalog, FruitEntry, ObstacleWeights};
    pub use crate::generation::events::{
        EventSink, FilteredSink, FnSink, GenerationEvent, GenerationEventKind, VecSink,
    };
    pub use crate::generation::guard::{OccupancyClass, SpatialOverlapGuard};
    pub use crate::generation::ledger::{BoundedHistory, HistoryBounds, OccupancyLedger};
    pub use crate::generation::plan::{
        generate_level, GenerationStats, LevelGenerator, LevelLayout, LevelPlan,
    };
    pub use crate::generation::progression::{DifficultyRegime, ProgressParams, ProgressionCurve};
    pub use crate::generation::segment::{Segment, SegmentGenerator, SegmentReport, SkipReason};
    pub use crate::scroll::{LevelOutcome, LiveEntity, ScrollSpeed, ScrollState, Track};
    pub use crate::tier::DifficultyTier;
}
