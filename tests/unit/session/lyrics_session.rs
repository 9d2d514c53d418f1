use super::*;
use crate::{
    lyrics::state::LineState,
    lyrics::timing::LyricLine,
    playback::clock::ManualClock,
    render::backend::RecordingBackend,
    text::measure::MonospaceMeasurer,
};

fn window() -> Bounds {
    Bounds::new(0.0, 0.0, 800.0, 600.0)
}

fn session() -> LyricsSession<MonospaceMeasurer, RecordingBackend> {
    let table = TimingTable::new(
        (0..6)
            .map(|i| LyricLine::new(format!("verse {i}"), f64::from(i) * 2.0, 2.0))
            .collect(),
    )
    .unwrap();
    LyricsSession::new(
        MonospaceMeasurer::default(),
        RecordingBackend::new(),
        window(),
        table,
        LyricsConfig::default(),
    )
    .unwrap()
}

#[test]
fn frames_advance_and_draw() {
    let mut s = session();
    let mut clock = ManualClock::new(12.0).unwrap();
    let dt = 1.0 / 30.0;
    let mut last = None;
    for _ in 0..90 {
        clock.advance(dt);
        last = Some(s.frame(&clock, dt, window()).unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.frame, 89);
    assert_eq!(last.active_line, Some(1));
    assert!(last.draws > 0);
    assert_eq!(s.backend().frame_count(), 90);
    assert_eq!(s.backend().last_frame().len(), last.draws);
    assert_eq!(s.view().line_state(1), LineState::Active);
}

#[test]
fn resize_relays_out_in_the_same_frame() {
    let mut s = session();
    let mut clock = ManualClock::new(12.0).unwrap();
    clock.seek(3.0).unwrap();
    s.frame(&clock, 0.0, window()).unwrap();
    let d = s.view().line_drawable(1).unwrap();
    assert_eq!(s.graph().canonical_position(d).unwrap().y, 210.0);

    let tall = Bounds::new(0.0, 0.0, 800.0, 1000.0);
    let stats = s.frame(&clock, 0.0, tall).unwrap();
    assert!(stats.relaid_out);
    assert_eq!(s.window(), tall);
    assert_eq!(s.graph().canonical_position(d).unwrap().y, 350.0);
    // Resizes snap instead of animating.
    assert_eq!(s.graph().drawable(d).unwrap().render_offset_y(), 0.0);
}

#[test]
fn resume_snaps_back_to_live() {
    let mut s = session();
    let mut clock = ManualClock::new(12.0).unwrap();
    clock.seek(7.0).unwrap();
    s.frame(&clock, 0.0, window()).unwrap();

    clock.pause();
    s.frame(&clock, 0.1, window()).unwrap();
    assert!(s.on_scroll(-50.0).unwrap());
    s.frame(&clock, 0.1, window()).unwrap();
    assert!(!s.view().is_live());

    clock.resume();
    s.frame(&clock, 0.1, window()).unwrap();
    assert!(s.view().is_live());
}

#[test]
fn close_releases_all_content() {
    let mut s = session();
    let clock = ManualClock::new(12.0).unwrap();
    s.frame(&clock, 0.0, window()).unwrap();
    let (_, backend) = s.close().unwrap();
    assert_eq!(backend.live_count(), 0);
    assert_eq!(backend.released().len(), 6);
}
