use std::cell::Cell;

use crate::{
    foundation::core::{Point, ScrollBehavior, SegmentIndex},
    journey::{layout::pause, session::Scene},
    stage::intent::{Intent, Stage},
};

/// Non-reentrant, non-queuing lock around hop sequences.
#[derive(Debug, Default)]
pub(crate) struct FlightGuard {
    busy: Cell<bool>,
}

/// Held for the duration of one hop sequence; releases the guard on drop.
#[derive(Debug)]
pub(crate) struct FlightPermit<'a> {
    busy: &'a Cell<bool>,
}

impl FlightGuard {
    /// `None` when a sequence is already in flight.
    pub(crate) fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        if self.busy.replace(true) {
            return None;
        }
        Some(FlightPermit { busy: &self.busy })
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// Result of asking for one segment's hop sequence.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SegmentOutcome {
    /// The sequence ran to completion.
    Completed {
        /// Where the destination checkpoint now sits; `None` when no hop position could be
        /// computed (e.g. missing curve).
        arrival: Option<Point>,
    },
    /// Another sequence was in flight; nothing happened.
    Dropped,
}

impl<S: Stage> Scene<'_, S> {
    /// Animate the traveling marker across `segment`, hop by hop.
    ///
    /// Each hop: place a trail marker, fade it in, land the traveling marker on it, pause.
    /// Hops run strictly in order. The last hop's position becomes the destination
    /// checkpoint's stored position.
    pub(crate) async fn run_segment(&self, segment: SegmentIndex) -> SegmentOutcome {
        let Some(_permit) = self.flight.try_acquire() else {
            tracing::debug!(segment = segment.0, "hop sequence already in flight; dropped");
            return SegmentOutcome::Dropped;
        };

        let t = &self.layout.timings;
        let mut last = None;
        for hop in 0..self.geometry.hops_per_segment() {
            let pos = self.geometry.hop_point(segment, hop);
            last = pos;

            let trail = pos.map(|at| self.place_trail_marker(segment, hop, at));
            match trail {
                Some(id) => {
                    pause(t.trail_fade_in_ms).await;
                    self.emit(Intent::RevealTrailMarker { id });
                    pause(t.trail_settle_ms.saturating_sub(t.trail_fade_in_ms)).await;
                    self.emit(Intent::SetTrailMarkerActive { id, active: true });
                }
                None => tracing::warn!(segment = segment.0, hop, "no hop position; step skipped"),
            }

            if let Some(at) = pos {
                self.land_marker(at).await;
            }

            pause(t.hop_pause_ms).await;
            if let Some(id) = trail {
                self.emit(Intent::SetTrailMarkerActive { id, active: false });
            }
        }

        if let Some(at) = last {
            let checkpoint = segment.to_checkpoint();
            {
                let mut s = self.session.borrow_mut();
                s.registry.set_arrival_position(checkpoint, at);
                s.marker.position = at;
            }
            self.emit(Intent::ShowCheckpointPin { checkpoint, at });
            self.emit(Intent::MarkerReachedCheckpoint);
            pause(t.checkpoint_reached_ms).await;
            tracing::info!(checkpoint = checkpoint.0, x = at.x, y = at.y, "checkpoint reached");
        }

        SegmentOutcome::Completed { arrival: last }
    }

    fn place_trail_marker(&self, segment: SegmentIndex, hop: usize, at: Point) -> u64 {
        let id = self.session.borrow_mut().push_trail(segment, hop, at);
        self.emit(Intent::PlaceTrailMarker {
            id,
            segment,
            hop,
            at,
        });
        id
    }

    async fn land_marker(&self, at: Point) {
        self.session.borrow_mut().marker.position = at;
        self.emit(Intent::MoveMarker { at });
        self.center_on_marker(ScrollBehavior::Instant);
        self.emit(Intent::MarkerLanding);
        pause(self.layout.timings.landing_ms).await;
        self.emit(Intent::MarkerLanded);
        tracing::debug!(x = at.x, y = at.y, "marker landed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journey/sequencer.rs"]
mod tests;
