use super::*;
use crate::{
    foundation::core::Bounds,
    layout::spec::{LayoutSpec, PosSpec, SizeSpec},
    render::backend::RecordingBackend,
    scene::graph::UiCtx,
    scene::node::Payload,
    text::measure::{FontKind, MonospaceMeasurer},
};

fn graph_with_line(y: f64) -> (SceneGraph, DrawableId, RecordingBackend) {
    let mut measurer = MonospaceMeasurer::default();
    let mut backend = RecordingBackend::new();
    let mut graph = SceneGraph::new(Bounds::new(0.0, 0.0, 800.0, 600.0));
    let d = {
        let mut ctx = UiCtx::new(&mut measurer, &mut backend);
        let d = graph
            .create_drawable(
                &mut ctx,
                Payload::text("line", FontKind::Regular, 20.0, false),
                graph.root(),
                LayoutSpec {
                    width: SizeSpec::Fixed(200.0),
                    height: SizeSpec::Fixed(30.0),
                    y: PosSpec::Offset(y),
                    ..LayoutSpec::default()
                },
            )
            .unwrap();
        graph.recompute(&mut ctx, d).unwrap();
        d
    };
    (graph, d, backend)
}

#[test]
fn same_target_is_a_no_op() {
    let (mut graph, d, _) = graph_with_line(100.0);
    let anim = graph
        .attach_animation(d, AnimationKind::Translate, 0.5)
        .unwrap();
    assert!(!graph.set_animation_target(anim, 100.0).unwrap());
    assert!(!graph.animation(anim).unwrap().is_active());

    assert!(graph.set_animation_target(anim, 40.0).unwrap());
    graph.step_animations(0.1).unwrap();
    let mid = graph.animation(anim).unwrap().current();
    assert!(!graph.set_animation_target(anim, 40.0).unwrap());
    assert_eq!(graph.animation(anim).unwrap().current(), mid);
    assert!(graph.animation(anim).unwrap().is_active());
}

#[test]
fn translate_is_a_render_offset_with_ease_out() {
    let (mut graph, d, _) = graph_with_line(100.0);
    let anim = graph
        .attach_animation(d, AnimationKind::Translate, 1.0)
        .unwrap();

    // Layout moved the line up by 60; the overlay keeps it at the old spot first.
    graph.set_animation_target(anim, 40.0).unwrap();
    assert_eq!(graph.drawable(d).unwrap().render_offset_y(), 60.0);

    graph.step_animations(0.5).unwrap();
    // 1 - (1 - 0.5)^3 = 0.875 of the way.
    let offset = graph.drawable(d).unwrap().render_offset_y();
    assert!((offset - 60.0 * 0.125).abs() < 1e-9, "{offset}");

    graph.step_animations(0.6).unwrap();
    assert_eq!(graph.drawable(d).unwrap().render_offset_y(), 0.0);
    assert!(!graph.animation(anim).unwrap().is_active());
}

#[test]
fn retarget_starts_from_the_rendered_value() {
    let (mut graph, d, _) = graph_with_line(0.0);
    let anim = graph
        .attach_animation(d, AnimationKind::Scale, 1.0)
        .unwrap();
    graph.set_animation_target(anim, 2.0).unwrap();
    graph.step_animations(0.5).unwrap();
    assert_eq!(graph.drawable(d).unwrap().scale(), 1.5);

    graph.set_animation_target(anim, 1.0).unwrap();
    let a = graph.animation(anim).unwrap();
    assert_eq!(a.from(), 1.5);
    assert_eq!(a.elapsed(), 0.0);
}

#[test]
fn fade_rounds_and_snaps_once() {
    let (mut graph, d, _) = graph_with_line(0.0);
    let anim = graph.attach_animation(d, AnimationKind::Fade, 0.2).unwrap();
    graph.set_animation_target(anim, 25.0).unwrap();
    graph.step_animations(0.1).unwrap();
    let alpha = graph.drawable(d).unwrap().alpha();
    assert!(alpha > 25 && alpha < 255, "{alpha}");

    assert_eq!(graph.step_animations(0.5).unwrap(), 1);
    assert_eq!(graph.drawable(d).unwrap().alpha(), 25);
    // Finished animations are no longer stepped.
    assert_eq!(graph.step_animations(0.5).unwrap(), 0);
}

#[test]
fn zero_duration_snaps_immediately() {
    let (mut graph, d, _) = graph_with_line(0.0);
    let anim = graph.attach_animation(d, AnimationKind::Fade, 0.0).unwrap();
    assert!(graph.set_animation_target(anim, 100.0).unwrap());
    assert_eq!(graph.drawable(d).unwrap().alpha(), 100);
    assert!(!graph.animation(anim).unwrap().is_active());
}

#[test]
fn disabled_subtree_is_not_stepped() {
    let (mut graph, d, _) = graph_with_line(0.0);
    let anim = graph.attach_animation(d, AnimationKind::Scale, 1.0).unwrap();
    graph.set_animation_target(anim, 2.0).unwrap();
    let root = graph.root();
    graph.set_container_enabled(root, false).unwrap();
    assert_eq!(graph.step_animations(0.5).unwrap(), 0);
    assert_eq!(graph.drawable(d).unwrap().scale(), 1.0);

    graph.set_container_enabled(root, true).unwrap();
    assert_eq!(graph.step_animations(0.5).unwrap(), 1);
    assert_eq!(graph.drawable(d).unwrap().scale(), 1.5);
}

#[test]
fn snap_jumps_to_the_end() {
    let (mut graph, d, _) = graph_with_line(50.0);
    let anim = graph
        .attach_animation(d, AnimationKind::Translate, 1.0)
        .unwrap();
    graph.set_animation_target(anim, 10.0).unwrap();
    graph.snap_drawable_animations(d).unwrap();
    assert_eq!(graph.drawable(d).unwrap().render_offset_y(), 0.0);
    assert_eq!(graph.animation(anim).unwrap().current(), 10.0);
}

#[test]
fn invalid_inputs_are_rejected() {
    let (mut graph, d, _) = graph_with_line(0.0);
    let anim = graph.attach_animation(d, AnimationKind::Fade, 0.2).unwrap();
    assert!(matches!(
        graph.set_animation_target(anim, f64::NAN),
        Err(LyricsError::Config(_))
    ));
    assert!(matches!(
        graph.step_animations(-1.0),
        Err(LyricsError::Config(_))
    ));
    graph.detach_animation(anim).unwrap();
    assert!(graph.drawable(d).unwrap().animations().is_empty());
    assert!(matches!(
        graph.set_animation_target(anim, 1.0),
        Err(LyricsError::InvalidState(_))
    ));
}
