use glam::DVec2;
use pitch_control::field::{DEFAULT_ON_FIELD_MARGIN, filter_on_field, on_field};

#[test]
fn test_on_field_centre_and_absent() {
    assert!(on_field(Some(DVec2::ZERO), DEFAULT_ON_FIELD_MARGIN));
    assert!(!on_field(None, DEFAULT_ON_FIELD_MARGIN));
}

#[test]
fn test_on_field_boundaries() {
    let margin = DEFAULT_ON_FIELD_MARGIN;
    let x_edge = 52.5 + margin;
    assert!(!on_field(Some(DVec2::new(x_edge + 0.01, 0.0)), margin));
    assert!(on_field(Some(DVec2::new(x_edge - 0.01, 0.0)), margin));
    assert!(on_field(Some(DVec2::new(x_edge, 0.0)), margin));
    assert!(on_field(Some(DVec2::new(-x_edge, 0.0)), margin));

    let y_edge = 34.0 + margin;
    assert!(on_field(Some(DVec2::new(0.0, y_edge)), margin));
    assert!(on_field(Some(DVec2::new(0.0, -y_edge + 0.01)), margin));
    assert!(!on_field(Some(DVec2::new(0.0, -y_edge - 0.01)), margin));
}

#[test]
fn test_on_field_zero_margin_and_nan() {
    assert!(on_field(Some(DVec2::new(52.5, 34.0)), 0.0));
    assert!(!on_field(Some(DVec2::new(52.6, 0.0)), 0.0));
    assert!(!on_field(Some(DVec2::new(f64::NAN, 0.0)), 5.0));
}

#[test]
fn test_filter_on_field_keeps_order() {
    let pts = [
        DVec2::new(10.0, 0.0),
        DVec2::new(80.0, 0.0),
        DVec2::new(-5.0, 36.0),
        DVec2::new(0.0, -50.0),
    ];
    let kept = filter_on_field(&pts, 5.0);
    assert_eq!(kept, vec![DVec2::new(10.0, 0.0), DVec2::new(-5.0, 36.0)]);
}
