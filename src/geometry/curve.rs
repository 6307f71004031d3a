use kurbo::{ParamCurve, ParamCurveArclen, PathSeg};

use crate::foundation::{
    core::{BezPath, Point},
    error::{TrailError, TrailResult},
};

const ARCLEN_ACCURACY: f64 = 1e-4;

/// Continuous curve sampled by arc length.
///
/// This is the only view of the path the progression engine needs; pages backed by a real
/// vector path and tests backed by a straight line both fit it.
pub trait Curve {
    /// Total arc length of the curve.
    fn total_length(&self) -> f64;
    /// Point at arc length `d`, clamped to `[0, total_length]`.
    fn point_at_distance(&self, d: f64) -> Point;
}

impl<C: Curve + ?Sized> Curve for Box<C> {
    fn total_length(&self) -> f64 {
        (**self).total_length()
    }

    fn point_at_distance(&self, d: f64) -> Point {
        (**self).point_at_distance(d)
    }
}

/// A [`BezPath`] with its per-segment arc lengths precomputed.
#[derive(Clone, Debug)]
pub struct ArclenPath {
    segs: Vec<PathSeg>,
    // cumulative[i] = arc length before segs[i]
    cumulative: Vec<f64>,
    total: f64,
}

impl ArclenPath {
    /// Build from a kurbo path. Paths without drawable segments are rejected.
    pub fn new(path: &BezPath) -> TrailResult<Self> {
        let segs: Vec<PathSeg> = path.segments().collect();
        if segs.is_empty() {
            return Err(TrailError::geometry("path has no segments"));
        }

        let mut cumulative = Vec::with_capacity(segs.len());
        let mut total = 0.0;
        for seg in &segs {
            cumulative.push(total);
            total += seg.arclen(ARCLEN_ACCURACY);
        }
        if !total.is_finite() || total <= 0.0 {
            return Err(TrailError::geometry("path length must be finite and > 0"));
        }

        Ok(Self {
            segs,
            cumulative,
            total,
        })
    }

    /// Parse SVG path data (`d` attribute).
    pub fn from_svg(d: &str) -> TrailResult<Self> {
        let d = d.trim();
        if d.is_empty() {
            return Err(TrailError::validation("path_d must be non-empty"));
        }
        let path = BezPath::from_svg(d)
            .map_err(|e| TrailError::validation(format!("invalid path_d: {e}")))?;
        Self::new(&path)
    }

    /// Smooth path through `points` in order, using vertical cubic handles between stops.
    pub fn through(points: &[Point]) -> TrailResult<Self> {
        let Some((first, rest)) = points.split_first() else {
            return Err(TrailError::geometry("at least two points are required"));
        };
        if rest.is_empty() {
            return Err(TrailError::geometry("at least two points are required"));
        }

        let mut path = BezPath::new();
        path.move_to(*first);
        let mut prev = *first;
        for &p in rest {
            let half = (p.y - prev.y) / 2.0;
            path.curve_to(
                Point::new(prev.x, prev.y + half),
                Point::new(p.x, p.y - half),
                p,
            );
            prev = p;
        }
        Self::new(&path)
    }
}

impl Curve for ArclenPath {
    fn total_length(&self) -> f64 {
        self.total
    }

    fn point_at_distance(&self, d: f64) -> Point {
        let d = d.clamp(0.0, self.total);
        // Last segment whose start is at or before `d`.
        let idx = self
            .cumulative
            .partition_point(|&start| start <= d)
            .saturating_sub(1);
        let seg = self.segs[idx];
        let local = d - self.cumulative[idx];
        let t = seg.inv_arclen(local, ARCLEN_ACCURACY);
        seg.eval(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/curve.rs"]
mod tests;
