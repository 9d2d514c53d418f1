use super::*;

#[test]
fn edges_and_rect_conversion_agree() {
    let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(b.right(), 40.0);
    assert_eq!(b.bottom(), 60.0);
    assert_eq!(b.to_rect(), Rect::new(10.0, 20.0, 40.0, 60.0));
}

#[test]
fn scaling_keeps_the_centre() {
    let b = Bounds::new(0.0, 0.0, 100.0, 50.0).scaled_about_center(0.5);
    assert_eq!(b, Bounds::new(25.0, 12.5, 50.0, 25.0));
}

#[test]
fn translation_moves_origin_only() {
    let b = Bounds::new(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(-1.0, 8.0));
    assert_eq!(b, Bounds::new(0.0, 10.0, 3.0, 4.0));
}

#[test]
fn non_finite_bounds_are_detected() {
    assert!(Bounds::ZERO.is_finite());
    assert!(!Bounds::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
}

