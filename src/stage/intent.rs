use crate::foundation::core::{CardIndex, CheckpointIndex, Point, Rect, ScrollBehavior, SegmentIndex};

/// A presentation change requested by the journey.
///
/// The progression engine never touches a page directly; it emits intents in the order they
/// must take effect and a [`Stage`] carries them out. Positions named `at` are in
/// path-container coordinates unless documented otherwise.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Show or hide the path container (curve, pins, trail).
    SetPathVisible {
        /// Target visibility.
        visible: bool,
    },
    /// Remove the start prompt.
    HideStartPrompt,
    /// Position the start board, in absolute document coordinates.
    PlaceStartBoard {
        /// Absolute position of checkpoint 0.
        at: Point,
    },
    /// Reveal the start board.
    ShowStartBoard,
    /// Create a trail marker at a hop position. Trail markers are never removed.
    PlaceTrailMarker {
        /// Session-unique trail marker id.
        id: u64,
        /// Segment being traveled.
        segment: SegmentIndex,
        /// Hop within the segment.
        hop: usize,
        /// Hop landing point.
        at: Point,
    },
    /// Fade a trail marker to full visibility.
    RevealTrailMarker {
        /// Trail marker id.
        id: u64,
    },
    /// Emphasize (or stop emphasizing) the trail marker under the traveling marker.
    SetTrailMarkerActive {
        /// Trail marker id.
        id: u64,
        /// Whether the marker is emphasized.
        active: bool,
    },
    /// Move the traveling marker.
    MoveMarker {
        /// New resting point.
        at: Point,
    },
    /// Show or hide the traveling marker.
    SetMarkerVisible {
        /// Target visibility.
        visible: bool,
    },
    /// Start the landing animation.
    MarkerLanding,
    /// Landing animation finished.
    MarkerLanded,
    /// Play the "checkpoint reached" look.
    MarkerReachedCheckpoint,
    /// Return the traveling marker to its normal look.
    ResetMarkerLook,
    /// Show a checkpoint pin.
    ShowCheckpointPin {
        /// Checkpoint index.
        checkpoint: CheckpointIndex,
        /// Stored checkpoint position.
        at: Point,
    },
    /// Open a card.
    ShowCard {
        /// Card index.
        card: CardIndex,
    },
    /// Close a card.
    HideCard {
        /// Card index.
        card: CardIndex,
    },
    /// Show or hide a card's advance control.
    SetAdvanceVisible {
        /// Card owning the control.
        card: CardIndex,
        /// Target visibility.
        visible: bool,
    },
    /// Show the small marker that reopens a closed card.
    ShowReopenMarker {
        /// Card reopened by the marker.
        card: CardIndex,
        /// Stored position of the card's checkpoint.
        at: Point,
        /// Horizontal anchoring relative to `at`.
        anchor: ReopenAnchor,
    },
    /// Hide a card's reopen marker while the card is open.
    HideReopenMarker {
        /// Card index.
        card: CardIndex,
    },
    /// Scroll the document vertically. Horizontal scroll is left unchanged.
    ScrollTo {
        /// Absolute vertical scroll offset.
        top: f64,
        /// Scroll style.
        behavior: ScrollBehavior,
    },
    /// Every card has been visited. Emitted once per session.
    JourneyComplete,
    /// The reader advanced past the last card.
    ShowFinale,
}

/// Horizontal anchoring of a reopen marker relative to its checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReopenAnchor {
    /// Marker's left edge at the checkpoint.
    Start,
    /// Marker centered on the checkpoint.
    #[default]
    Center,
    /// Marker's right edge at the checkpoint.
    End,
}

/// Elements the journey needs to measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    /// The "begin" prompt shown before the journey starts.
    StartPrompt,
    /// The container hosting the path; its origin anchors all container coordinates.
    PathContainer,
    /// An open card.
    Card(CardIndex),
}

/// Visible viewport, including the visual-viewport offset used by mobile browsers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportMetrics {
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
    /// Offset of the visual viewport from the layout viewport's top.
    #[serde(default)]
    pub offset_top: f64,
    /// Offset of the visual viewport from the layout viewport's left.
    #[serde(default)]
    pub offset_left: f64,
}

impl ViewportMetrics {
    /// Viewport without a visual-viewport offset.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_top: 0.0,
            offset_left: 0.0,
        }
    }
}

/// Rendering adapter contract.
///
/// Measurements return `None` when the element or layout is unavailable; the journey then
/// skips the dependent step instead of failing.
pub trait Stage {
    /// Carry out one intent. Called in emission order.
    fn apply(&mut self, intent: Intent);
    /// Current viewport.
    fn viewport(&self) -> Option<ViewportMetrics>;
    /// Total scrollable document height.
    fn scroll_height(&self) -> f64;
    /// Absolute document rectangle of `element`.
    fn element_rect(&self, element: Element) -> Option<Rect>;
}
