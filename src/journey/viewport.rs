use crate::{
    foundation::core::{Point, ScrollBehavior},
    journey::{layout::pause, session::Scene},
    stage::intent::{Element, Intent, Stage, ViewportMetrics},
};

/// Vertical scroll offset that puts absolute `y` in the middle of the viewport.
///
/// The result is clamped to `[0, scroll_height - viewport.height]`; when the document does not
/// scroll at all only the lower bound applies. Horizontal scroll is never computed.
pub fn scroll_target(y: f64, viewport: &ViewportMetrics, scroll_height: f64) -> f64 {
    let max = scroll_height - viewport.height;
    let target = y - viewport.height / 2.0 + viewport.offset_top;
    if max <= 0.0 {
        return target.max(0.0);
    }
    target.clamp(0.0, max)
}

impl<S: Stage> Scene<'_, S> {
    /// Scroll so that absolute `point` sits at mid-viewport.
    pub(crate) fn center_on(&self, point: Point, behavior: ScrollBehavior) {
        let target = {
            let stage = self.stage.borrow();
            let Some(viewport) = stage.viewport() else {
                tracing::debug!("no viewport; centering skipped");
                return;
            };
            scroll_target(point.y, &viewport, stage.scroll_height())
        };
        self.emit(Intent::ScrollTo {
            top: target,
            behavior,
        });
    }

    /// Center on an element's middle. Returns whether it could be measured.
    pub(crate) fn center_element(&self, element: Element, behavior: ScrollBehavior) -> bool {
        let rect = self.stage.borrow().element_rect(element);
        match rect {
            Some(r) => {
                self.center_on(r.center(), behavior);
                true
            }
            None => false,
        }
    }

    /// Absolute document position of a container-local point.
    pub(crate) fn to_absolute(&self, local: Point) -> Option<Point> {
        let container = self.stage.borrow().element_rect(Element::PathContainer)?;
        Some(container.origin() + local.to_vec2())
    }

    pub(crate) fn center_on_marker(&self, behavior: ScrollBehavior) {
        let local = self.session.borrow().marker.position;
        if let Some(abs) = self.to_absolute(local) {
            self.center_on(abs, behavior);
        }
    }

    pub(crate) fn center_on_start_prompt(&self, behavior: ScrollBehavior) {
        if self.session.borrow().start_prompt_visible {
            self.center_element(Element::StartPrompt, behavior);
        }
    }

    /// Re-center on whatever currently has focus: the start prompt while it is showing,
    /// otherwise the traveling marker if visible.
    pub(crate) fn maintain_focus(&self, behavior: ScrollBehavior) {
        let (prompt, marker) = {
            let s = self.session.borrow();
            (s.start_prompt_visible, s.marker.visible)
        };
        if prompt {
            self.center_on_start_prompt(behavior);
        } else if marker {
            self.center_on_marker(behavior);
        }
    }

    /// Center on the open card a bounded number of times while its layout settles.
    ///
    /// Stops early once no card is open.
    pub(crate) async fn center_active_card(&self, behavior: ScrollBehavior) {
        let t = &self.layout.timings;
        for attempt in 0..t.center_attempts {
            let Some(card) = self.session.borrow().active_card else {
                return;
            };
            if !self.center_element(Element::Card(card), behavior) {
                tracing::debug!(card = card.0, attempt, "card not laid out yet");
            }
            if attempt + 1 < t.center_attempts {
                pause(t.center_retry_ms).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journey/viewport.rs"]
mod tests;
