use super::*;

fn extents() -> ScrollExtents {
    ScrollExtents {
        hidden_history: 120.0,
        visible_remaining: 300.0,
    }
}

#[test]
fn small_deltas_are_ignored() {
    let mut scroll = ScrollController::new(10.0, 0.5);
    assert!(!scroll.on_scroll(0.2, extents()));
    assert!(!scroll.on_scroll(-0.49, extents()));
    assert!(!scroll.on_scroll(f64::NAN, extents()));
    assert!(scroll.is_live());
}

#[test]
fn offset_is_scaled_and_clamped() {
    let mut scroll = ScrollController::new(10.0, 0.5);
    assert!(scroll.on_scroll(3.0, extents()));
    assert_eq!(scroll.offset(), 30.0);
    scroll.on_scroll(100.0, extents());
    assert_eq!(scroll.offset(), 300.0);
    assert!(!scroll.on_scroll(1.0, extents()));
    scroll.on_scroll(-1000.0, extents());
    assert_eq!(scroll.offset(), -120.0);
    assert!(!scroll.is_live());
}

#[test]
fn clamp_holds_for_any_input_sequence() {
    let mut scroll = ScrollController::new(7.5, 0.1);
    let ext = extents();
    for (i, delta) in [3.0, -9.0, 40.0, -0.05, -80.0, 12.5, 1e6, -1e6, 0.3]
        .into_iter()
        .enumerate()
    {
        scroll.on_scroll(delta, ext);
        assert!(
            scroll.offset() >= -ext.hidden_history && scroll.offset() <= ext.visible_remaining,
            "step {i}: {}",
            scroll.offset()
        );
    }
}

#[test]
fn reclamp_and_snap() {
    let mut scroll = ScrollController::new(1.0, 0.0);
    scroll.on_scroll(250.0, extents());
    assert!(scroll.reclamp(ScrollExtents {
        hidden_history: 0.0,
        visible_remaining: 100.0,
    }));
    assert_eq!(scroll.offset(), 100.0);
    assert!(scroll.snap_to_active());
    assert!(scroll.is_live());
    assert!(!scroll.snap_to_active());
}
