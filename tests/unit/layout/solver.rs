use super::*;
use crate::layout::spec::{Placement, PosSpec};

fn parent() -> Bounds {
    Bounds::new(0.0, 0.0, 1000.0, 600.0)
}

fn none() -> FixedIntrinsic {
    FixedIntrinsic::default()
}

#[test]
fn proportional_width_with_centering() {
    let spec = LayoutSpec {
        width: SizeSpec::Proportional(0.5),
        height: SizeSpec::Fixed(40.0),
        x: PosSpec::Centered {
            anchor_far: false,
            offset: 0.0,
        },
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), None, &mut none()).unwrap();
    assert_eq!(b.w, 500.0);
    assert_eq!(b.x, 250.0);
}

#[test]
fn resolve_is_deterministic() {
    let spec = LayoutSpec {
        width: SizeSpec::Proportional(0.3),
        height: SizeSpec::Intrinsic,
        x: PosSpec::AnchoredFar(12.0),
        y: PosSpec::Proportional(0.25),
        ..LayoutSpec::default()
    };
    let mut intrinsic = FixedIntrinsic { w: 80.0, h: 33.0 };
    let a = resolve(&spec, parent(), None, &mut intrinsic).unwrap();
    for _ in 0..8 {
        assert_eq!(resolve(&spec, parent(), None, &mut intrinsic).unwrap(), a);
    }
    assert_eq!(a, Bounds::new(1000.0 - 300.0 - 12.0, 150.0, 300.0, 33.0));
}

#[test]
fn centered_anchor_far_subtracts_own_extent() {
    let spec = LayoutSpec {
        width: SizeSpec::Fixed(10.0),
        height: SizeSpec::Fixed(100.0),
        y: PosSpec::Centered {
            anchor_far: true,
            offset: 5.0,
        },
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), None, &mut none()).unwrap();
    assert_eq!(b.y, 300.0 - 50.0 - 100.0 + 5.0);
}

#[test]
fn negative_offsets_wrap_from_the_far_edge() {
    let spec = LayoutSpec {
        width: SizeSpec::Fixed(100.0),
        height: SizeSpec::Fixed(20.0),
        x: PosSpec::Offset(-10.0),
        y: PosSpec::Offset(-10.0),
        wrap_negative: true,
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), None, &mut none()).unwrap();
    assert_eq!(b.x, 1000.0 - 100.0 - 10.0);
    assert_eq!(b.y, 600.0 - 20.0 - 10.0);

    let plain = LayoutSpec {
        wrap_negative: false,
        ..spec
    };
    assert_eq!(resolve(&plain, parent(), None, &mut none()).unwrap().x, -10.0);
}

#[test]
fn aspect_ratio_derives_from_known_dimension() {
    let spec = LayoutSpec {
        width: SizeSpec::Fixed(200.0),
        height: SizeSpec::FromAspectRatio,
        ..LayoutSpec::default()
    };
    let mut image = FixedIntrinsic { w: 400.0, h: 100.0 };
    let b = resolve(&spec, parent(), None, &mut image).unwrap();
    assert_eq!((b.w, b.h), (200.0, 50.0));

    let spec = LayoutSpec {
        width: SizeSpec::FromAspectRatio,
        height: SizeSpec::Fixed(30.0),
        aspect_ratio: Some(2.0),
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), None, &mut none()).unwrap();
    assert_eq!((b.w, b.h), (60.0, 30.0));
}

#[test]
fn aspect_ratio_without_ratio_is_a_config_error() {
    let spec = LayoutSpec {
        width: SizeSpec::Fixed(200.0),
        height: SizeSpec::FromAspectRatio,
        ..LayoutSpec::default()
    };
    let err = resolve(&spec, parent(), None, &mut none()).unwrap_err();
    assert!(matches!(err, LyricsError::Config(_)));
}

#[test]
fn relative_placements_follow_the_reference() {
    let reference = Bounds::new(100.0, 200.0, 300.0, 40.0);
    let mut spec = LayoutSpec {
        width: SizeSpec::FromReference,
        height: SizeSpec::Fixed(20.0),
        x: PosSpec::RelativeTo {
            placement: Placement::Aligned,
            offset: 0.0,
        },
        y: PosSpec::RelativeTo {
            placement: Placement::After,
            offset: 8.0,
        },
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), Some(reference), &mut none()).unwrap();
    assert_eq!(b, Bounds::new(100.0, 248.0, 300.0, 20.0));

    spec.y = PosSpec::RelativeTo {
        placement: Placement::Before,
        offset: 8.0,
    };
    let b = resolve(&spec, parent(), Some(reference), &mut none()).unwrap();
    assert_eq!(b.y, 200.0 - 20.0 - 8.0);
}

#[test]
fn relative_placement_without_reference_bounds_is_a_relation_error() {
    let spec = LayoutSpec {
        y: PosSpec::RelativeTo {
            placement: Placement::After,
            offset: 0.0,
        },
        ..LayoutSpec::default()
    };
    let err = resolve(&spec, parent(), None, &mut none()).unwrap_err();
    assert!(matches!(err, LyricsError::InvalidRelation(_)));
}

#[test]
fn inherited_size_copies_the_reference_dimensions() {
    let reference = Bounds::new(40.0, 100.0, 320.0, 48.0);
    let spec = LayoutSpec {
        width: SizeSpec::FromReference,
        height: SizeSpec::FromReference,
        y: PosSpec::RelativeTo {
            placement: Placement::After,
            offset: 8.0,
        },
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), Some(reference), &mut none()).unwrap();
    assert_eq!((b.w, b.h), (320.0, 48.0));
    assert_eq!(b.y, 156.0);

    // One inherited axis, the other explicit.
    let spec = LayoutSpec {
        width: SizeSpec::FromReference,
        height: SizeSpec::Fixed(10.0),
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), Some(reference), &mut none()).unwrap();
    assert_eq!((b.w, b.h), (320.0, 10.0));
}

#[test]
fn inherited_size_without_reference_bounds_is_a_relation_error() {
    let spec = LayoutSpec {
        height: SizeSpec::FromReference,
        ..LayoutSpec::default()
    };
    let err = resolve(&spec, parent(), None, &mut none()).unwrap_err();
    assert!(matches!(err, LyricsError::InvalidRelation(_)), "{err}");
}

#[test]
fn intrinsic_width_is_bounded_by_explicit_width() {
    struct Wrapping;
    impl IntrinsicSize for Wrapping {
        fn intrinsic_size(&mut self, max_width: f64) -> LyricsResult<(f64, f64)> {
            // 1000px of text, 20px per line.
            let lines = (1000.0 / max_width).ceil();
            Ok((max_width.min(1000.0), lines * 20.0))
        }
    }
    let spec = LayoutSpec {
        width: SizeSpec::Fixed(250.0),
        height: SizeSpec::Intrinsic,
        ..LayoutSpec::default()
    };
    let b = resolve(&spec, parent(), None, &mut Wrapping).unwrap();
    assert_eq!((b.w, b.h), (250.0, 80.0));
}

#[test]
fn content_alignment_offsets() {
    let container = Bounds::new(0.0, 100.0, 50.0, 200.0);
    assert_eq!(
        content_alignment_offset(container, 100.0, 160.0, ContentAlignment::Start),
        0.0
    );
    assert_eq!(
        content_alignment_offset(container, 100.0, 160.0, ContentAlignment::Center),
        70.0
    );
    assert_eq!(
        content_alignment_offset(container, 100.0, 160.0, ContentAlignment::End),
        140.0
    );
    // Overflowing content is pinned to the top edge.
    assert_eq!(
        content_alignment_offset(container, 120.0, 520.0, ContentAlignment::Center),
        -20.0
    );
}
