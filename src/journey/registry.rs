use std::collections::BTreeSet;

use crate::foundation::core::{CheckpointIndex, Point};

/// Ordered checkpoint positions plus the set of checkpoints reached at least once.
///
/// The unlocked set only grows. A checkpoint's stored position starts as the nominal layout
/// estimate and is replaced by the marker's landing point whenever the marker arrives there.
#[derive(Clone, Debug)]
pub struct CheckpointRegistry {
    positions: Vec<Point>,
    arrived: BTreeSet<CheckpointIndex>,
    unlocked: BTreeSet<CheckpointIndex>,
}

impl CheckpointRegistry {
    /// Registry over the nominal layout table, with the origin unlocked.
    pub fn new(nominal: Vec<Point>) -> Self {
        let mut unlocked = BTreeSet::new();
        if !nominal.is_empty() {
            unlocked.insert(CheckpointIndex::ORIGIN);
        }
        Self {
            positions: nominal,
            arrived: BTreeSet::new(),
            unlocked,
        }
    }

    /// Number of checkpoints.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the registry holds no checkpoints.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The final checkpoint.
    pub fn last_index(&self) -> CheckpointIndex {
        CheckpointIndex(self.positions.len().saturating_sub(1))
    }

    /// Currently stored position.
    pub fn get(&self, index: CheckpointIndex) -> Option<Point> {
        self.positions.get(index.0).copied()
    }

    /// Record where the marker actually came to rest at `index`.
    pub(crate) fn set_arrival_position(&mut self, index: CheckpointIndex, pos: Point) {
        if let Some(slot) = self.positions.get_mut(index.0) {
            *slot = pos;
            self.arrived.insert(index);
        }
    }

    /// Whether `index` holds an arrival position rather than its nominal estimate.
    pub fn has_arrived(&self, index: CheckpointIndex) -> bool {
        self.arrived.contains(&index)
    }

    /// Whether `index` has been reached at least once.
    pub fn is_unlocked(&self, index: CheckpointIndex) -> bool {
        self.unlocked.contains(&index)
    }

    /// Mark `index` as reached. Returns `false` when it already was, or is out of range.
    pub fn unlock(&mut self, index: CheckpointIndex) -> bool {
        if index.0 >= self.positions.len() {
            return false;
        }
        self.unlocked.insert(index)
    }

    /// Unlocked checkpoints in ascending order.
    pub fn unlocked(&self) -> impl Iterator<Item = CheckpointIndex> + '_ {
        self.unlocked.iter().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journey/registry.rs"]
mod tests;
