use super::*;
use crate::geometry::curve::ArclenPath;

fn line_geometry(checkpoints: usize, hops: usize) -> PathGeometry {
    // 100 units per segment along the x axis.
    let d = format!("M0,0 L{},0", (checkpoints - 1) * 100);
    let curve = ArclenPath::from_svg(&d).unwrap();
    PathGeometry::new(Some(Box::new(curve)), checkpoints, hops)
}

#[test]
fn hop_fractions_stay_strictly_inside_the_segment() {
    let g = line_geometry(9, 10);
    let fractions: Vec<f64> = (0..10).map(|h| g.hop_fraction(h)).collect();
    for (h, f) in fractions.iter().enumerate() {
        assert!((f - (h + 1) as f64 / 11.0).abs() < 1e-12);
        assert!(*f > 0.0 && *f < 1.0);
    }
    assert!(fractions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn segments_split_total_length_evenly() {
    let g = line_geometry(5, 4);
    assert_eq!(g.segment_count(), 4);
    let p = g.point_at(SegmentIndex(2), 0.5).unwrap();
    assert!((p.x - 250.0).abs() < 1e-6);
    let p = g.point_at(SegmentIndex(3), 1.0).unwrap();
    assert!((p.x - 400.0).abs() < 1e-6);
}

#[test]
fn last_hop_stops_short_of_the_segment_end() {
    let g = line_geometry(3, 10);
    let last = g.hop_point(SegmentIndex(0), 9).unwrap();
    assert!((last.x - 100.0 * 10.0 / 11.0).abs() < 1e-6);
    assert!(last.x < 100.0);
}

#[test]
fn missing_curve_or_segment_yields_none() {
    let g = PathGeometry::new(None, 4, 10);
    assert!(!g.has_curve());
    assert!(g.point_at(SegmentIndex(0), 0.5).is_none());
    assert!(g.plan().is_empty());

    let g = line_geometry(4, 10);
    assert!(g.point_at(SegmentIndex(3), 0.5).is_none());
    assert!(g.point_at(SegmentIndex(0), f64::NAN).is_none());
}

#[test]
fn plan_arrival_is_the_last_hop() {
    let g = line_geometry(4, 6);
    let plan = g.plan();
    assert_eq!(plan.len(), 3);
    for seg in &plan {
        assert_eq!(seg.hops.len(), 6);
        assert_eq!(Some(&seg.arrival), seg.hops.last());
    }
    assert!((plan[1].arrival.x - (100.0 + 100.0 * 6.0 / 7.0)).abs() < 1e-6);
}
