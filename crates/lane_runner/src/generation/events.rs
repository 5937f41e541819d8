//! Event types and sinks for observing generation runs.
//!
//! This module defines [`GenerationEvent`] and a small set of sinks to
//! collect or filter events while a level is generated via
//! [`crate::generation::plan::LevelGenerator`] or
//! [`crate::generation::plan::generate_level`]. Sinks only observe; the
//! generated requests are identical with or without one attached.
use crate::config::LevelConfig;
use crate::entity::{EntityKind, EntityRequest, FinishMarker};
use crate::generation::plan::GenerationStats;
use crate::generation::progression::ProgressParams;
use crate::generation::segment::SkipReason;
use crate::tier::DifficultyTier;

/// Describes events emitted while generating a level.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Emitted once before the first segment.
    RunStarted {
        /// The configuration used.
        config: LevelConfig,
        /// Tier driving the level length.
        tier: DifficultyTier,
        /// Total level length in world units.
        total_distance: f32,
        /// Number of segments that will be generated.
        segment_count: usize,
    },

    /// Emitted when a segment starts, after its parameters are resolved.
    SegmentStarted {
        index: usize,
        start_x: f32,
        progress: f32,
        params: ProgressParams,
    },

    /// Emitted for every committed placement, in generation order.
    PlacementMade { request: EntityRequest },

    /// Emitted when a placement is dropped.
    PlacementSkipped {
        segment: usize,
        /// Resolved kind, if the catalog produced one.
        kind: Option<EntityKind>,
        /// Requested x position.
        x: f32,
        reason: SkipReason,
    },

    /// Emitted once the finish marker is placed.
    FinishPlaced { marker: FinishMarker },

    /// Emitted when the run finishes.
    RunFinished { stats: GenerationStats },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. segment index, category).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`GenerationEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    RunStarted,
    SegmentStarted,
    PlacementMade,
    PlacementSkipped,
    FinishPlaced,
    RunFinished,
    Warning,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::RunStarted { .. } => GenerationEventKind::RunStarted,
            GenerationEvent::SegmentStarted { .. } => GenerationEventKind::SegmentStarted,
            GenerationEvent::PlacementMade { .. } => GenerationEventKind::PlacementMade,
            GenerationEvent::PlacementSkipped { .. } => GenerationEventKind::PlacementSkipped,
            GenerationEvent::FinishPlaced { .. } => GenerationEventKind::FinishPlaced,
            GenerationEvent::RunFinished { .. } => GenerationEventKind::RunFinished,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Lets producers skip building events nobody listens to.
    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, kind: GenerationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }
}

/// Forwards only the listed event kinds to the inner sink.
pub struct FilteredSink<S: EventSink> {
    inner: S,
    kinds: Vec<GenerationEventKind>,
}

impl<S: EventSink> FilteredSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = GenerationEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilteredSink<S> {
    fn send(&mut self, event: GenerationEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> GenerationEvent {
        GenerationEvent::Warning {
            context: context.into(),
            message: "m".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(GenerationEventKind::Warning), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!EventSink::wants(&(), GenerationEventKind::PlacementMade));
    }

    #[test]
    fn filtered_sink_drops_other_kinds() {
        let mut sink = FilteredSink::new(VecSink::new(), [GenerationEventKind::FinishPlaced]);
        assert!(!sink.wants(GenerationEventKind::Warning));
        sink.send(warning("ignored"));
        sink.send(GenerationEvent::FinishPlaced {
            marker: FinishMarker {
                x: 540.0,
                score_requirement: 100,
            },
        });
        let inner = sink.into_inner();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.count(GenerationEventKind::FinishPlaced), 1);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(count, 2);
    }
}
