use super::*;
use slotmap::SlotMap;

fn some_drawable() -> DrawableId {
    let mut arena = SlotMap::<DrawableId, ()>::with_key();
    arena.insert(())
}

#[test]
fn keep_aspect_with_both_dimensions_explicit_is_a_config_error() {
    let err = LayoutSpec::builder()
        .explicit_width(100.0)
        .explicit_height(50.0)
        .keep_aspect(Some(2.0))
        .build()
        .unwrap_err();
    assert!(matches!(err, LyricsError::Config(_)));
}

#[test]
fn keep_aspect_derives_the_unset_axis() {
    let spec = LayoutSpec::builder()
        .explicit_width(100.0)
        .keep_aspect(None)
        .build()
        .unwrap();
    assert_eq!(spec.height, SizeSpec::FromAspectRatio);

    let spec = LayoutSpec::builder()
        .proportional_height(0.5)
        .keep_aspect(Some(1.5))
        .build()
        .unwrap();
    assert_eq!(spec.width, SizeSpec::FromAspectRatio);
    assert_eq!(spec.aspect_ratio, Some(1.5));
}

#[test]
fn aspect_on_both_axes_is_rejected() {
    let spec = LayoutSpec {
        width: SizeSpec::FromAspectRatio,
        height: SizeSpec::FromAspectRatio,
        aspect_ratio: Some(1.0),
        ..LayoutSpec::default()
    };
    assert!(matches!(spec.validate(), Err(LyricsError::Config(_))));
}

#[test]
fn relative_placement_without_reference_is_rejected() {
    let spec = LayoutSpec {
        y: PosSpec::RelativeTo {
            placement: Placement::After,
            offset: 4.0,
        },
        ..LayoutSpec::default()
    };
    assert!(matches!(spec.validate(), Err(LyricsError::Config(_))));
}

#[test]
fn reference_without_axis_use_is_valid_but_unused() {
    let spec = LayoutSpec::builder()
        .relative_to(some_drawable())
        .build()
        .unwrap();
    assert!(spec.reference.is_some());
    assert!(!spec.uses_reference());
}

#[test]
fn negative_fixed_size_is_rejected() {
    let err = LayoutSpec::builder()
        .explicit_width(-1.0)
        .build()
        .unwrap_err();
    assert!(matches!(err, LyricsError::Config(_)));
}

#[test]
fn center_helpers_produce_centered_positions() {
    let spec = LayoutSpec::builder()
        .center_x()
        .center_y()
        .build()
        .unwrap();
    assert_eq!(
        spec.x,
        PosSpec::Centered {
            anchor_far: false,
            offset: 0.0
        }
    );
    assert_eq!(spec.x, spec.y);
}
