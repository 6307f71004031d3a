use std::{
    cell::{Ref, RefCell, RefMut},
    str::FromStr,
};

use crate::{
    foundation::{
        core::{CardIndex, CheckpointIndex, Point, ScrollBehavior, SegmentIndex},
        error::{TrailError, TrailResult},
    },
    geometry::hops::PathGeometry,
    journey::{
        cards::NextTarget,
        layout::{JourneyLayout, pause},
        sequencer::{FlightGuard, SegmentOutcome},
        session::{Scene, Session, SessionSnapshot},
    },
    stage::intent::{Intent, Stage},
};

/// A user action on the journey page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", content = "card", rename_all = "snake_case")]
pub enum Action {
    /// Press the start prompt.
    Start,
    /// Press a card's advance control.
    Advance(CardIndex),
    /// Press a card's close control.
    Close(CardIndex),
    /// Click a card's reopen marker.
    Reopen(CardIndex),
    /// The viewport changed size.
    Resize,
}

impl FromStr for Action {
    type Err = TrailError;

    /// Parses `start`, `resize`, `advance:N`, `close:N` and `reopen:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((n, a)) => (n.trim(), Some(a.trim())),
            None => (s, None),
        };
        let card = || -> TrailResult<CardIndex> {
            let a = arg.ok_or_else(|| {
                TrailError::validation(format!("action '{name}' needs a card index"))
            })?;
            a.parse::<usize>()
                .map(CardIndex)
                .map_err(|e| TrailError::validation(format!("bad card index '{a}': {e}")))
        };
        match name {
            "start" => Ok(Self::Start),
            "resize" => Ok(Self::Resize),
            "advance" => Ok(Self::Advance(card()?)),
            "close" => Ok(Self::Close(card()?)),
            "reopen" => Ok(Self::Reopen(card()?)),
            other => Err(TrailError::validation(format!("unknown action '{other}'"))),
        }
    }
}

/// What a command did.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A hop sequence ran before the next card was shown.
    Animated {
        /// Segment traveled.
        segment: SegmentIndex,
        /// Stored position of the reached checkpoint.
        arrival: Option<Point>,
    },
    /// The change took effect without animation.
    Instant,
    /// The finale was shown.
    Completion,
    /// Nothing changed.
    Ignored(IgnoreReason),
}

/// Why a command was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The journey is already under way.
    AlreadyStarted,
    /// The journey has not been started yet.
    NotStarted,
    /// A hop sequence is in flight.
    Busy,
    /// The card index does not exist.
    UnknownCard,
    /// The card is not the one currently open.
    NotActive,
    /// The card has never been opened, so there is nothing to reopen.
    NotVisited,
}

/// Owns one page session and turns user actions into ordered intents on a [`Stage`].
///
/// All methods take `&self`: the controller lives on a single thread and commands may
/// interleave at their suspension points. Only one hop sequence can run at a time; requests
/// made while one is in flight are dropped, never queued.
pub struct JourneyController<S: Stage> {
    layout: JourneyLayout,
    geometry: PathGeometry,
    session: RefCell<Session>,
    stage: RefCell<S>,
    flight: FlightGuard,
}

impl<S: Stage> JourneyController<S> {
    /// Validate `layout`, build its curve, and attach `stage`.
    pub fn new(layout: JourneyLayout, stage: S) -> TrailResult<Self> {
        layout.validate()?;
        let geometry = layout.build_geometry()?;
        Ok(Self::with_geometry(layout, geometry, stage))
    }

    /// Use caller-provided geometry (e.g. a page-supplied curve, or none at all).
    ///
    /// `layout` is not validated here.
    pub fn with_geometry(layout: JourneyLayout, geometry: PathGeometry, stage: S) -> Self {
        let session = Session::new(&layout);
        Self {
            layout,
            geometry,
            session: RefCell::new(session),
            stage: RefCell::new(stage),
            flight: FlightGuard::default(),
        }
    }

    fn scene(&self) -> Scene<'_, S> {
        Scene {
            layout: &self.layout,
            geometry: &self.geometry,
            session: &self.session,
            stage: &self.stage,
            flight: &self.flight,
        }
    }

    /// Layout in use.
    pub fn layout(&self) -> &JourneyLayout {
        &self.layout
    }

    /// Hop geometry in use.
    pub fn geometry(&self) -> &PathGeometry {
        &self.geometry
    }

    /// Borrow the stage.
    pub fn stage(&self) -> Ref<'_, S> {
        self.stage.borrow()
    }

    /// Mutably borrow the stage (e.g. to simulate a resize). Do not hold across an await.
    pub fn stage_mut(&self) -> RefMut<'_, S> {
        self.stage.borrow_mut()
    }

    /// Give the stage back.
    pub fn into_stage(self) -> S {
        self.stage.into_inner()
    }

    /// Current progress.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.scene().snapshot()
    }

    /// Whether a hop sequence is running.
    pub fn is_animating(&self) -> bool {
        self.flight.is_busy()
    }

    /// Where advancing from `current` would lead right now.
    pub fn next_target_for(&self, current: CardIndex) -> NextTarget {
        self.scene().next_target_for(current)
    }

    /// Run the hop sequence of one segment (single-flight).
    pub async fn run_segment(&self, segment: SegmentIndex) -> SegmentOutcome {
        self.scene().run_segment(segment).await
    }

    /// Prepare the page: hide the path, park the marker at the origin, then center the start
    /// prompt.
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) {
        let scene = self.scene();
        let origin = {
            let mut s = self.session.borrow_mut();
            let origin = s.registry.get(CheckpointIndex::ORIGIN);
            if let Some(at) = origin {
                s.marker.position = at;
            }
            origin
        };

        scene.emit(Intent::SetPathVisible { visible: false });
        self.place_start_board();
        if let Some(at) = origin {
            scene.emit(Intent::MoveMarker { at });
            scene.emit(Intent::ShowCheckpointPin {
                checkpoint: CheckpointIndex::ORIGIN,
                at,
            });
        }

        pause(self.layout.timings.start_prompt_delay_ms).await;
        scene.center_on_start_prompt(ScrollBehavior::Instant);
    }

    /// Begin the journey: reveal the path, hop to the first checkpoint and open card 0.
    #[tracing::instrument(skip(self))]
    pub async fn start_journey(&self) -> CommandOutcome {
        if self.session.borrow().started {
            return CommandOutcome::Ignored(IgnoreReason::AlreadyStarted);
        }
        if self.flight.is_busy() {
            return CommandOutcome::Ignored(IgnoreReason::Busy);
        }
        let scene = self.scene();
        let t = &self.layout.timings;
        {
            let mut s = self.session.borrow_mut();
            s.started = true;
            s.start_prompt_visible = false;
        }

        scene.emit(Intent::HideStartPrompt);
        scene.emit(Intent::SetPathVisible { visible: true });
        pause(t.path_reveal_ms).await;
        pause(t.layout_settle_ms).await;

        self.place_start_board();
        scene.emit(Intent::ShowStartBoard);
        pause(t.layout_settle_ms).await;

        scene.center_on_marker(ScrollBehavior::Instant);
        pause(t.pre_hop_pause_ms).await;

        let first = CardIndex(0);
        let checkpoint = scene.card_checkpoint(first);
        let Some(segment) = checkpoint.inbound_segment() else {
            return CommandOutcome::Instant;
        };
        let outcome = self.hop_then_show(segment, checkpoint, first).await;
        if outcome == CommandOutcome::Ignored(IgnoreReason::Busy) {
            tracing::debug!("first hop dropped; journey can be started again");
            self.session.borrow_mut().started = false;
        }
        outcome
    }

    /// Close the open `card` and move on to the next card, hopping first if its checkpoint
    /// has never been reached.
    #[tracing::instrument(skip(self))]
    pub async fn advance(&self, card: CardIndex) -> CommandOutcome {
        if let Some(reason) = self.check_open(card) {
            return CommandOutcome::Ignored(reason);
        }
        let scene = self.scene();
        scene.hide_card(card);
        pause(self.layout.timings.card_fade_ms).await;

        match scene.next_target_for(card) {
            NextTarget::Completion => {
                tracing::info!(card = card.0, "advanced past the last card");
                scene.emit(Intent::ShowFinale);
                CommandOutcome::Completion
            }
            NextTarget::Card {
                card: next,
                requires_animation: false,
                ..
            } => {
                self.open_card(next);
                scene.center_active_card(ScrollBehavior::Smooth).await;
                CommandOutcome::Instant
            }
            NextTarget::Card {
                card: next,
                checkpoint,
                requires_animation: true,
            } => {
                self.show_marker_at_current();
                scene.emit(Intent::ResetMarkerLook);
                pause(self.layout.timings.pre_hop_pause_ms).await;

                let Some(segment) = checkpoint.inbound_segment() else {
                    return CommandOutcome::Instant;
                };
                self.hop_then_show(segment, checkpoint, next).await
            }
        }
    }

    /// Close the open `card` and hide the traveling marker.
    #[tracing::instrument(skip(self))]
    pub fn close_card(&self, card: CardIndex) -> CommandOutcome {
        if let Some(reason) = self.check_open(card) {
            return CommandOutcome::Ignored(reason);
        }
        let scene = self.scene();
        scene.hide_card(card);
        self.session.borrow_mut().marker.visible = false;
        scene.emit(Intent::SetMarkerVisible { visible: false });
        CommandOutcome::Instant
    }

    /// Reopen a previously visited card from its reopen marker, closing whichever card is
    /// open. Reopening the open card only re-centers on it.
    #[tracing::instrument(skip(self))]
    pub async fn reopen_card(&self, card: CardIndex) -> CommandOutcome {
        if card.0 >= self.layout.card_count {
            return CommandOutcome::Ignored(IgnoreReason::UnknownCard);
        }
        if !self.session.borrow().visited.contains(&card) {
            return CommandOutcome::Ignored(IgnoreReason::NotVisited);
        }
        if self.flight.is_busy() {
            return CommandOutcome::Ignored(IgnoreReason::Busy);
        }
        if self.session.borrow().active_card != Some(card) {
            self.open_card(card);
        }
        self.scene().center_active_card(ScrollBehavior::Smooth).await;
        CommandOutcome::Instant
    }

    /// React to a viewport resize: re-place the start board and re-center the focus.
    #[tracing::instrument(skip(self))]
    pub fn resize(&self) {
        self.place_start_board();
        self.scene().maintain_focus(ScrollBehavior::Instant);
    }

    /// Dispatch one user action.
    pub async fn dispatch(&self, action: Action) -> CommandOutcome {
        match action {
            Action::Start => self.start_journey().await,
            Action::Advance(card) => self.advance(card).await,
            Action::Close(card) => self.close_card(card),
            Action::Reopen(card) => self.reopen_card(card).await,
            Action::Resize => {
                self.resize();
                CommandOutcome::Instant
            }
        }
    }

    async fn hop_then_show(
        &self,
        segment: SegmentIndex,
        checkpoint: CheckpointIndex,
        card: CardIndex,
    ) -> CommandOutcome {
        let scene = self.scene();
        let arrival = match scene.run_segment(segment).await {
            SegmentOutcome::Dropped => return CommandOutcome::Ignored(IgnoreReason::Busy),
            SegmentOutcome::Completed { arrival } => arrival,
        };
        self.session.borrow_mut().registry.unlock(checkpoint);

        self.open_card(card);
        scene.center_active_card(ScrollBehavior::Smooth).await;
        CommandOutcome::Animated { segment, arrival }
    }

    /// Why `card` cannot be advanced or closed right now, if anything.
    fn check_open(&self, card: CardIndex) -> Option<IgnoreReason> {
        let s = self.session.borrow();
        if !s.started {
            return Some(IgnoreReason::NotStarted);
        }
        if self.flight.is_busy() {
            return Some(IgnoreReason::Busy);
        }
        if card.0 >= self.layout.card_count {
            return Some(IgnoreReason::UnknownCard);
        }
        if s.active_card != Some(card) {
            return Some(IgnoreReason::NotActive);
        }
        None
    }

    /// Show `card`, closing a different open card first so at most one is ever open.
    fn open_card(&self, card: CardIndex) {
        let scene = self.scene();
        let open = self.session.borrow().active_card;
        if let Some(other) = open.filter(|&c| c != card) {
            scene.hide_card(other);
        }
        scene.show_card(card);
    }

    fn show_marker_at_current(&self) {
        let scene = self.scene();
        let at = {
            let mut s = self.session.borrow_mut();
            let cp = s.current_checkpoint;
            let at = s.registry.get(cp);
            s.marker.visible = true;
            if let Some(at) = at {
                s.marker.position = at;
            }
            at
        };
        scene.emit(Intent::SetMarkerVisible { visible: true });
        if let Some(at) = at {
            scene.emit(Intent::MoveMarker { at });
        }
        scene.center_on_marker(ScrollBehavior::Instant);
    }

    fn place_start_board(&self) {
        let scene = self.scene();
        let origin = self.session.borrow().registry.get(CheckpointIndex::ORIGIN);
        if let Some(at) = origin.and_then(|p| scene.to_absolute(p)) {
            scene.emit(Intent::PlaceStartBoard { at });
        }
    }
}

impl<S: Stage + std::fmt::Debug> std::fmt::Debug for JourneyController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyController")
            .field("layout", &self.layout)
            .field("geometry", &self.geometry)
            .field("session", &self.session)
            .field("stage", &self.stage)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journey/controller.rs"]
mod tests;
