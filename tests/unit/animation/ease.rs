use super::*;

#[test]
fn out_cubic_is_fast_then_slow() {
    assert_eq!(Ease::OutCubic.apply(0.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(1.0), 1.0);
    assert!((Ease::OutCubic.apply(0.5) - 0.875).abs() < 1e-12);
    assert!(Ease::OutCubic.apply(0.25) > Ease::Linear.apply(0.25));
}

#[test]
fn apply_clamps_progress() {
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(3.0), 1.0);
}

#[test]
fn lerp_hits_both_ends() {
    assert_eq!(Ease::OutCubic.lerp(10.0, 20.0, 0.0), 10.0);
    assert_eq!(Ease::OutCubic.lerp(10.0, 20.0, 1.0), 20.0);
    assert_eq!(Ease::Linear.lerp(1.0, 0.5, 0.5), 0.75);
}
