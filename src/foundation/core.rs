pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Position of a checkpoint along the journey path. Index 0 is the origin.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CheckpointIndex(pub usize);

impl CheckpointIndex {
    /// The origin checkpoint, unlocked from the start and never animated to.
    pub const ORIGIN: Self = Self(0);

    /// Segment that ends at this checkpoint, if any.
    pub fn inbound_segment(self) -> Option<SegmentIndex> {
        self.0.checked_sub(1).map(SegmentIndex)
    }
}

/// Narrative card position. Card `i` lives at checkpoint `min(i + 1, last)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CardIndex(pub usize);

impl CardIndex {
    /// The card following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Portion of the path between checkpoint `k` and `k + 1`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SegmentIndex(pub usize);

impl SegmentIndex {
    /// Checkpoint the segment starts from.
    pub fn from_checkpoint(self) -> CheckpointIndex {
        CheckpointIndex(self.0)
    }

    /// Checkpoint reached when the segment completes.
    pub fn to_checkpoint(self) -> CheckpointIndex {
        CheckpointIndex(self.0 + 1)
    }
}

/// How a scroll request should be carried out by the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Jump without animation.
    #[default]
    Instant,
    /// Animated scroll.
    Smooth,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
