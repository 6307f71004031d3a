use std::cell::Cell;

use crate::{
    foundation::core::{CardIndex, Point, Rect, ScrollBehavior, Vec2},
    stage::intent::{Element, Intent, Stage, ViewportMetrics},
};

/// In-memory [`Stage`] for tests, replays and debugging.
///
/// Intents are kept in order. Measurements come from a small simulated page: a fixed path
/// container, a start prompt centered on its own rectangle until hidden, and an open card laid
/// out around the traveling marker once it has "settled".
#[derive(Debug)]
pub struct RecordingStage {
    intents: Vec<Intent>,
    viewport: Option<ViewportMetrics>,
    scroll_height: f64,
    container: Option<Rect>,
    start_prompt: Option<Rect>,
    card_size: Vec2,
    card_settle_polls: u32,
    polls_left: Cell<u32>,
    marker: Point,
    open_card: Option<CardIndex>,
    scroll_top: f64,
}

impl Default for RecordingStage {
    fn default() -> Self {
        let container = Rect::new(440.0, 120.0, 840.0, 2820.0);
        Self {
            intents: Vec::new(),
            viewport: Some(ViewportMetrics::new(1280.0, 800.0)),
            scroll_height: 3000.0,
            container: Some(container),
            start_prompt: Some(Rect::from_center_size(
                container.origin() + Vec2::new(200.0, 100.0),
                (220.0, 56.0),
            )),
            card_size: Vec2::new(320.0, 420.0),
            card_settle_polls: 0,
            polls_left: Cell::new(0),
            marker: Point::ZERO,
            open_card: None,
            scroll_top: 0.0,
        }
    }
}

impl RecordingStage {
    /// Desktop-sized simulated page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the viewport (`None` simulates a page without one).
    pub fn with_viewport(mut self, viewport: Option<ViewportMetrics>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Replace the path container rectangle (`None` simulates a missing container).
    pub fn with_container(mut self, container: Option<Rect>) -> Self {
        self.container = container;
        self
    }

    /// Replace the document height.
    pub fn with_scroll_height(mut self, h: f64) -> Self {
        self.scroll_height = h;
        self
    }

    /// Replace the start prompt rectangle.
    pub fn with_start_prompt(mut self, rect: Option<Rect>) -> Self {
        self.start_prompt = rect;
        self
    }

    /// Number of measurements an opened card fails before its layout is available.
    pub fn with_card_settle_polls(mut self, polls: u32) -> Self {
        self.card_settle_polls = polls;
        self
    }

    /// Simulate a viewport resize (e.g. a mobile toolbar collapsing).
    pub fn resize(&mut self, viewport: ViewportMetrics) {
        self.viewport = Some(viewport);
    }

    /// All intents applied so far.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Drain recorded intents.
    pub fn take_intents(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    /// Count intents matching `pred`.
    pub fn count(&self, pred: impl Fn(&Intent) -> bool) -> usize {
        self.intents.iter().filter(|i| pred(i)).count()
    }

    /// Vertical scroll targets in order.
    pub fn scrolls(&self) -> Vec<(f64, ScrollBehavior)> {
        self.intents
            .iter()
            .filter_map(|i| match i {
                Intent::ScrollTo { top, behavior } => Some((*top, *behavior)),
                _ => None,
            })
            .collect()
    }

    /// Last applied vertical scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Last marker position applied.
    pub fn marker(&self) -> Point {
        self.marker
    }
}

impl Stage for RecordingStage {
    fn apply(&mut self, intent: Intent) {
        match &intent {
            Intent::HideStartPrompt => self.start_prompt = None,
            Intent::MoveMarker { at } => self.marker = *at,
            Intent::ShowCard { card } => {
                self.open_card = Some(*card);
                self.polls_left.set(self.card_settle_polls);
            }
            Intent::HideCard { card } if self.open_card == Some(*card) => self.open_card = None,
            Intent::ScrollTo { top, .. } => self.scroll_top = *top,
            _ => {}
        }
        self.intents.push(intent);
    }

    fn viewport(&self) -> Option<ViewportMetrics> {
        self.viewport
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn element_rect(&self, element: Element) -> Option<Rect> {
        match element {
            Element::StartPrompt => self.start_prompt,
            Element::PathContainer => self.container,
            Element::Card(card) => {
                if self.open_card != Some(card) {
                    return None;
                }
                let left = self.polls_left.get();
                if left > 0 {
                    self.polls_left.set(left - 1);
                    return None;
                }
                let origin = self.container?.origin();
                let center = origin + self.marker.to_vec2();
                Some(Rect::from_center_size(
                    center,
                    (self.card_size.x, self.card_size.y),
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/recording.rs"]
mod tests;
