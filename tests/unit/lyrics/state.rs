use super::*;

fn fade() -> FadeParams {
    FadeParams {
        max_distance: 3,
        alpha_near: 225.0,
        alpha_span: 200.0,
        intermission_min_duration: 1.5,
    }
}

fn song() -> Vec<LyricLine> {
    vec![
        LyricLine::new("Hello", 0.0, 2.0),
        LyricLine::new("World", 2.0, 3.0),
        LyricLine::new("", 5.0, 2.0),
    ]
}

fn states(plan: &Plan) -> Vec<LineState> {
    plan.lines.iter().map(|l| l.state).collect()
}

#[test]
fn alpha_ramp() {
    let f = fade();
    assert_eq!(f.alpha_at(0), 225);
    assert_eq!(f.alpha_at(1), 158);
    assert_eq!(f.alpha_at(2), 92);
    assert_eq!(f.alpha_at(3), 25);
    assert_eq!(f.alpha_at(9), 25);
    assert_eq!(f.min_alpha(), 25);
}

#[test]
fn context_line_stays_visible() {
    let plan = derive_plan(&song(), 3.0, false, &fade());
    assert_eq!(
        states(&plan),
        [LineState::Inactive, LineState::Active, LineState::Inactive]
    );
    assert_eq!(plan.reference, 1);
    assert_eq!(plan.lines[0].distance, 1);
    assert_eq!(plan.lines[0].alpha, 158);
    assert_eq!(plan.lines[1].alpha, 255);
    assert_eq!(plan.lines[2].alpha, 158);
}

#[test]
fn intermission_forces_minimum_alpha() {
    let plan = derive_plan(&song(), 6.0, false, &fade());
    assert!(plan.intermission);
    assert_eq!(
        states(&plan),
        [LineState::Hidden, LineState::Hidden, LineState::Active]
    );
    assert_eq!(plan.lines[0].alpha, 25);
    assert_eq!(plan.lines[1].alpha, 25);
}

#[test]
fn gap_between_lines_is_almost_hidden() {
    let lines = vec![
        LyricLine::new("a", 0.0, 1.0),
        LyricLine::new("b", 3.0, 1.0),
    ];
    let plan = derive_plan(&lines, 2.0, false, &fade());
    assert_eq!(states(&plan), [LineState::AlmostHidden, LineState::Inactive]);
    assert_eq!(plan.reference, 0);
    assert_eq!(plan.lines[0].alpha, 158);
    assert_eq!(plan.active_index(), None);
}

#[test]
fn hidden_lines_fade_out_only_at_live_position() {
    let lines: Vec<_> = (0..6)
        .map(|i| LyricLine::new(format!("line {i}"), f64::from(i), 1.0))
        .collect();
    let live = derive_plan(&lines, 4.5, false, &fade());
    assert_eq!(live.lines[0].state, LineState::Hidden);
    assert_eq!(live.lines[0].alpha, 0);
    assert_eq!(live.lines[3].state, LineState::Inactive);
    assert_eq!(live.earliest_visible(), Some(3));

    let scrolled = derive_plan(&lines, 4.5, true, &fade());
    assert_eq!(scrolled.lines[0].alpha, 25);
    assert_eq!(scrolled.lines[2].alpha, 92);
    assert_eq!(states(&live), states(&scrolled));
}

#[test]
fn blank_lines_do_not_count_against_fade() {
    let lines = vec![
        LyricLine::new("a", 0.0, 1.0),
        LyricLine::new("", 1.0, 0.5),
        LyricLine::new("", 1.5, 0.5),
        LyricLine::new("b", 2.0, 1.0),
    ];
    let plan = derive_plan(&lines, 0.5, false, &fade());
    assert_eq!(plan.lines[3].distance, 1);
    assert_eq!(plan.lines[3].alpha, 158);
    assert_eq!(plan.lines[2].distance, 1);
}

#[test]
fn exactly_one_active_inside_intervals() {
    let lines: Vec<_> = (0..10)
        .map(|i| LyricLine::new("x", f64::from(i) * 2.0, 1.5))
        .collect();
    let mut t = -1.0;
    while t < 22.0 {
        let plan = derive_plan(&lines, t, false, &fade());
        let inside = lines.iter().any(|l| l.contains(t));
        assert_eq!(plan.active_count(), usize::from(inside), "t = {t}");
        t += 0.25;
    }
}

#[test]
fn before_first_line_everything_is_upcoming() {
    let plan = derive_plan(&song(), -1.0, false, &fade());
    assert_eq!(plan.reference, 0);
    assert!(plan.lines.iter().all(|l| l.state == LineState::Inactive));
    assert_eq!(plan.lines[0].alpha, 225);
}

#[test]
fn after_the_last_line_everything_is_hidden() {
    let plan = derive_plan(&song(), 8.0, false, &fade());
    assert!(plan.lines.iter().all(|l| l.state == LineState::Hidden));
    assert!(plan.lines.iter().all(|l| l.alpha == 0));
}

#[test]
fn empty_table_has_empty_plan() {
    assert_eq!(derive_plan(&[], 1.0, false, &fade()), Plan::default());
}
