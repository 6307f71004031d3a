use super::*;

#[test]
fn target_centers_point_vertically() {
    let v = ViewportMetrics::new(1280.0, 800.0);
    assert_eq!(scroll_target(1500.0, &v, 3000.0), 1100.0);
}

#[test]
fn target_is_clamped_to_scrollable_range() {
    let v = ViewportMetrics::new(1280.0, 800.0);
    assert_eq!(scroll_target(100.0, &v, 3000.0), 0.0);
    assert_eq!(scroll_target(2900.0, &v, 3000.0), 2200.0);
}

#[test]
fn unscrollable_document_only_clamps_at_zero() {
    let v = ViewportMetrics::new(1280.0, 800.0);
    assert_eq!(scroll_target(300.0, &v, 600.0), 0.0);
    assert_eq!(scroll_target(700.0, &v, 600.0), 300.0);
}

#[test]
fn visual_viewport_offset_shifts_target() {
    let v = ViewportMetrics {
        width: 390.0,
        height: 600.0,
        offset_top: 40.0,
        offset_left: 0.0,
    };
    assert_eq!(scroll_target(1000.0, &v, 3000.0), 740.0);
}

#[test]
fn target_matches_clamp_formula_across_positions() {
    let v = ViewportMetrics::new(800.0, 700.0);
    let max = 2500.0 - 700.0;
    for y in [0.0, 349.0, 350.0, 351.0, 1200.0, 2149.0, 2150.0, 2151.0, 2500.0] {
        let expected = (y - 350.0_f64).clamp(0.0, max);
        assert_eq!(scroll_target(y, &v, 2500.0), expected, "y = {y}");
    }
}
