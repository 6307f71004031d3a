//! trailhop drives a guided, linear journey along a curved path.
//!
//! A traveling marker hops from checkpoint to checkpoint, leaving a trail behind it, and a
//! narrative card opens at each stop. The engine is headless: it owns the session state and
//! emits [`Intent`]s that a [`Stage`] (the page, a test recorder, a replay printer) carries out.
//!
//! # Moving parts
//!
//! 1. **Geometry**: a [`Curve`] split into equal segments, with hops at `(h + 1) / (H + 1)`
//!    of each segment ([`PathGeometry`]).
//! 2. **Registry**: checkpoint positions and the unlocked set ([`CheckpointRegistry`]).
//! 3. **Hop sequence**: one segment's ordered animation, guarded so only one runs at a time.
//! 4. **Cards**: show/hide, visited tracking, next-target decisions ([`NextTarget`]).
//! 5. **Viewport**: vertical-only centering on the current focus ([`scroll_target`]).
//! 6. **Controller**: user actions in, intents out ([`JourneyController`]).
//!
//! Progress is ephemeral: unlocked checkpoints and visited cards only ever grow, and revisiting
//! an unlocked checkpoint never replays its animation.
//!
//! The [`notify`] surface models the separate "promise" mail collaborator.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod geometry;
mod journey;
mod stage;

/// Promise-letter delivery: transport contract, retries, and the UI trigger model.
pub mod notify;

pub use foundation::core::{
    BezPath, CardIndex, CheckpointIndex, Point, Rect, ScrollBehavior, SegmentIndex, Vec2,
};
pub use foundation::error::{TrailError, TrailResult};
pub use geometry::curve::{ArclenPath, Curve};
pub use geometry::hops::{PathGeometry, SegmentPlan};
pub use journey::cards::{NextTarget, card_checkpoint, reopen_anchor};
pub use journey::controller::{Action, CommandOutcome, IgnoreReason, JourneyController};
pub use journey::layout::{JourneyLayout, Timings};
pub use journey::registry::CheckpointRegistry;
pub use journey::sequencer::SegmentOutcome;
pub use journey::session::{MarkerState, SessionSnapshot, TrailMarker};
pub use journey::viewport::scroll_target;
pub use stage::intent::{Element, Intent, ReopenAnchor, Stage, ViewportMetrics};
pub use stage::recording::RecordingStage;
