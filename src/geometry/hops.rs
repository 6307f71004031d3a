use crate::{
    foundation::core::{Point, SegmentIndex},
    geometry::curve::Curve,
};

/// Evenly divides a [`Curve`] into one segment per checkpoint gap and places hops inside each.
///
/// Hop `h` of `H` lands at fraction `(h + 1) / (H + 1)` of its segment, so no hop ever sits on
/// a segment endpoint. The last hop (fraction `H / (H + 1)`) is where a checkpoint is reached.
pub struct PathGeometry {
    curve: Option<Box<dyn Curve>>,
    segments: usize,
    hops_per_segment: usize,
}

/// Precomputed hop points for one segment.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SegmentPlan {
    /// Segment index.
    pub segment: SegmentIndex,
    /// Hop landing points in travel order.
    pub hops: Vec<Point>,
    /// Where the destination checkpoint ends up (the last hop).
    pub arrival: Point,
}

impl PathGeometry {
    /// `checkpoint_count` checkpoints give `checkpoint_count - 1` segments.
    pub fn new(
        curve: Option<Box<dyn Curve>>,
        checkpoint_count: usize,
        hops_per_segment: usize,
    ) -> Self {
        Self {
            curve,
            segments: checkpoint_count.saturating_sub(1),
            hops_per_segment,
        }
    }

    /// Whether a curve is available at all.
    pub fn has_curve(&self) -> bool {
        self.curve.is_some()
    }

    /// Number of segments along the path.
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Hops animated per segment.
    pub fn hops_per_segment(&self) -> usize {
        self.hops_per_segment
    }

    /// Point at `fraction` of `segment`.
    ///
    /// Returns `None` when there is no usable curve or the segment is out of range; callers
    /// skip the step rather than fail.
    pub fn point_at(&self, segment: SegmentIndex, fraction: f64) -> Option<Point> {
        let curve = self.curve.as_ref()?;
        if segment.0 >= self.segments || !fraction.is_finite() {
            return None;
        }
        let total = curve.total_length();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        let seg_len = total / self.segments as f64;
        let start = segment.0 as f64 * seg_len;
        let at = start + seg_len * fraction.clamp(0.0, 1.0);
        Some(curve.point_at_distance(at))
    }

    /// Fraction of the segment covered after hop `hop` (0-based).
    pub fn hop_fraction(&self, hop: usize) -> f64 {
        (hop + 1) as f64 / (self.hops_per_segment + 1) as f64
    }

    /// Landing point of hop `hop` within `segment`.
    pub fn hop_point(&self, segment: SegmentIndex, hop: usize) -> Option<Point> {
        self.point_at(segment, self.hop_fraction(hop))
    }

    /// Plan one segment without animating it.
    pub fn plan_segment(&self, segment: SegmentIndex) -> Option<SegmentPlan> {
        let hops = (0..self.hops_per_segment)
            .map(|h| self.hop_point(segment, h))
            .collect::<Option<Vec<_>>>()?;
        let arrival = *hops.last()?;
        Some(SegmentPlan {
            segment,
            hops,
            arrival,
        })
    }

    /// Plan every segment in order. Empty when there is no curve.
    pub fn plan(&self) -> Vec<SegmentPlan> {
        (0..self.segments)
            .filter_map(|s| self.plan_segment(SegmentIndex(s)))
            .collect()
    }
}

impl std::fmt::Debug for PathGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathGeometry")
            .field("has_curve", &self.has_curve())
            .field("segments", &self.segments)
            .field("hops_per_segment", &self.hops_per_segment)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/hops.rs"]
mod tests;
