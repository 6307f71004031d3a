use std::{cell::RefCell, collections::BTreeSet};

use crate::{
    foundation::core::{CardIndex, CheckpointIndex, Point, SegmentIndex},
    geometry::hops::PathGeometry,
    journey::{layout::JourneyLayout, registry::CheckpointRegistry, sequencer::FlightGuard},
    stage::intent::{Intent, Stage},
};

/// Where the traveling marker rests and whether it is shown.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MarkerState {
    /// Resting point in container coordinates.
    pub position: Point,
    /// Whether the marker is displayed.
    pub visible: bool,
}

/// A trail marker left behind by one hop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrailMarker {
    /// Session-unique id.
    pub id: u64,
    /// Segment traveled.
    pub segment: SegmentIndex,
    /// Hop within the segment.
    pub hop: usize,
    /// Hop landing point.
    pub at: Point,
}

/// Ephemeral progress of one page session. Every set here only grows.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) registry: CheckpointRegistry,
    pub(crate) current_checkpoint: CheckpointIndex,
    pub(crate) visited: BTreeSet<CardIndex>,
    pub(crate) active_card: Option<CardIndex>,
    pub(crate) marker: MarkerState,
    pub(crate) started: bool,
    pub(crate) start_prompt_visible: bool,
    pub(crate) completion_signalled: bool,
    pub(crate) reopen_shown: BTreeSet<CardIndex>,
    pub(crate) trail: Vec<TrailMarker>,
}

impl Session {
    pub(crate) fn new(layout: &JourneyLayout) -> Self {
        let registry = CheckpointRegistry::new(layout.checkpoints.clone());
        let origin = registry.get(CheckpointIndex::ORIGIN).unwrap_or(Point::ZERO);
        Self {
            registry,
            current_checkpoint: CheckpointIndex::ORIGIN,
            visited: BTreeSet::new(),
            active_card: None,
            marker: MarkerState {
                position: origin,
                visible: true,
            },
            started: false,
            start_prompt_visible: true,
            completion_signalled: false,
            reopen_shown: BTreeSet::new(),
            trail: Vec::new(),
        }
    }

    pub(crate) fn push_trail(&mut self, segment: SegmentIndex, hop: usize, at: Point) -> u64 {
        let id = self.trail.len() as u64;
        self.trail.push(TrailMarker {
            id,
            segment,
            hop,
            at,
        });
        id
    }
}

/// Read-only view of session progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SessionSnapshot {
    /// Whether the journey has been started.
    pub started: bool,
    /// Checkpoint of the most recently shown card.
    pub current_checkpoint: CheckpointIndex,
    /// Checkpoints reached at least once, ascending.
    pub unlocked: Vec<CheckpointIndex>,
    /// Cards opened at least once, ascending.
    pub visited: Vec<CardIndex>,
    /// Currently open card.
    pub active_card: Option<CardIndex>,
    /// Traveling marker.
    pub marker: MarkerState,
    /// Stored checkpoint positions.
    pub checkpoints: Vec<Point>,
    /// Trail left so far.
    pub trail: Vec<TrailMarker>,
    /// Whether every card has been visited.
    pub complete: bool,
    /// Whether a hop sequence is running.
    pub animating: bool,
}

/// Borrowed view of everything a journey step may read or mutate.
///
/// Borrows of `session` and `stage` are kept short and never held across an await.
pub(crate) struct Scene<'a, S: Stage> {
    pub(crate) layout: &'a JourneyLayout,
    pub(crate) geometry: &'a PathGeometry,
    pub(crate) session: &'a RefCell<Session>,
    pub(crate) stage: &'a RefCell<S>,
    pub(crate) flight: &'a FlightGuard,
}

impl<S: Stage> Scene<'_, S> {
    pub(crate) fn emit(&self, intent: Intent) {
        tracing::trace!(?intent, "emit");
        self.stage.borrow_mut().apply(intent);
    }

    pub(crate) fn emit_all(&self, intents: impl IntoIterator<Item = Intent>) {
        for intent in intents {
            self.emit(intent);
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let s = self.session.borrow();
        SessionSnapshot {
            started: s.started,
            current_checkpoint: s.current_checkpoint,
            unlocked: s.registry.unlocked().collect(),
            visited: s.visited.iter().copied().collect(),
            active_card: s.active_card,
            marker: s.marker,
            checkpoints: (0..s.registry.len())
                .filter_map(|i| s.registry.get(CheckpointIndex(i)))
                .collect(),
            trail: s.trail.clone(),
            complete: s.completion_signalled,
            animating: self.flight.is_busy(),
        }
    }
}
