use crate::{
    foundation::core::{CardIndex, CheckpointIndex, Point, Rect},
    journey::session::Scene,
    stage::intent::{Element, Intent, ReopenAnchor, Stage},
};

/// Checkpoint a card is revealed at: `min(card + 1, last)`.
pub fn card_checkpoint(card: CardIndex, last: CheckpointIndex) -> CheckpointIndex {
    CheckpointIndex((card.0 + 1).min(last.0))
}

/// Where advancing from a card leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum NextTarget {
    /// Another card, possibly behind a hop sequence.
    Card {
        /// Card to show next.
        card: CardIndex,
        /// Its checkpoint.
        checkpoint: CheckpointIndex,
        /// Whether the checkpoint still has to be reached.
        requires_animation: bool,
    },
    /// Past the last card: the journey's finale.
    Completion,
}

impl NextTarget {
    /// Whether following this target runs a hop sequence.
    pub fn requires_animation(self) -> bool {
        match self {
            Self::Card {
                requires_animation, ..
            } => requires_animation,
            Self::Completion => false,
        }
    }
}

/// Anchor for a reopen marker of `width` placed at absolute `x` inside `container`.
///
/// Only narrow viewports adjust the anchor; wide ones always center.
pub fn reopen_anchor(
    x: f64,
    width: f64,
    container: Rect,
    viewport_width: f64,
    breakpoint: f64,
) -> ReopenAnchor {
    if viewport_width > breakpoint {
        return ReopenAnchor::Center;
    }
    let half = width / 2.0;
    if x - half < container.x0 {
        ReopenAnchor::Start
    } else if x + half > container.x1 {
        ReopenAnchor::End
    } else {
        ReopenAnchor::Center
    }
}

impl<S: Stage> Scene<'_, S> {
    pub(crate) fn card_checkpoint(&self, card: CardIndex) -> CheckpointIndex {
        card_checkpoint(card, self.session.borrow().registry.last_index())
    }

    pub(crate) fn next_target_for(&self, current: CardIndex) -> NextTarget {
        let next = current.next();
        if next.0 >= self.layout.card_count {
            return NextTarget::Completion;
        }
        let checkpoint = self.card_checkpoint(next);
        let unlocked = self.session.borrow().registry.is_unlocked(checkpoint);
        NextTarget::Card {
            card: next,
            checkpoint,
            requires_animation: !unlocked,
        }
    }

    /// Open `card`: mark it visited, park the marker at its checkpoint's stored position and
    /// refresh the advance control. Returns `false` for an unknown card.
    pub(crate) fn show_card(&self, card: CardIndex) -> bool {
        if card.0 >= self.layout.card_count {
            tracing::debug!(card = card.0, "show ignored: no such card");
            return false;
        }
        let checkpoint = self.card_checkpoint(card);

        let mut out = vec![Intent::ShowCard { card }];
        let completed = {
            let mut s = self.session.borrow_mut();
            s.active_card = Some(card);
            s.current_checkpoint = checkpoint;
            if let Some(at) = s.registry.get(checkpoint) {
                s.marker.position = at;
                s.marker.visible = true;
                out.push(Intent::MoveMarker { at });
                out.push(Intent::SetMarkerVisible { visible: true });
            }
            s.visited.insert(card);
            let all = s.visited.len() >= self.layout.card_count;
            let first_time = all && !s.completion_signalled;
            if first_time {
                s.completion_signalled = true;
            }
            if s.reopen_shown.remove(&card) {
                out.push(Intent::HideReopenMarker { card });
            }
            first_time
        };
        self.emit_all(out);

        if completed {
            tracing::info!("every card visited; journey complete");
            self.emit(Intent::JourneyComplete);
        }

        let visible = match self.next_target_for(card) {
            NextTarget::Completion => true,
            NextTarget::Card {
                requires_animation, ..
            } => requires_animation,
        };
        self.emit(Intent::SetAdvanceVisible { card, visible });
        true
    }

    /// Close `card` and leave a reopen marker at its checkpoint. Returns `false` for an unknown
    /// card.
    pub(crate) fn hide_card(&self, card: CardIndex) -> bool {
        if card.0 >= self.layout.card_count {
            tracing::debug!(card = card.0, "hide ignored: no such card");
            return false;
        }
        let checkpoint = self.card_checkpoint(card);

        let at = {
            let mut s = self.session.borrow_mut();
            if s.active_card == Some(card) {
                s.active_card = None;
            }
            s.registry.get(checkpoint)
        };
        self.emit(Intent::HideCard { card });

        if let Some(at) = at {
            let anchor = self.anchor_for(at);
            self.session.borrow_mut().reopen_shown.insert(card);
            self.emit(Intent::ShowReopenMarker { card, at, anchor });
        }
        true
    }

    fn anchor_for(&self, at: Point) -> ReopenAnchor {
        let stage = self.stage.borrow();
        let (Some(container), Some(viewport)) =
            (stage.element_rect(Element::PathContainer), stage.viewport())
        else {
            return ReopenAnchor::Center;
        };
        reopen_anchor(
            container.x0 + at.x,
            self.layout.reopen_marker_width,
            container,
            viewport.width,
            self.layout.mobile_breakpoint,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journey/cards.rs"]
mod tests;
