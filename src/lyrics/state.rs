use crate::lyrics::timing::LyricLine;

/// Visual state of one lyric line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineState {
    /// Not advanced yet.
    #[default]
    None,
    /// Upcoming, or the context line just above the reference line.
    Inactive,
    Active,
    /// Finished, but the next line has not started.
    AlmostHidden,
    /// Finished and superseded.
    Hidden,
}

/// Constants of the distance fade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeParams {
    pub max_distance: usize,
    pub alpha_near: f64,
    pub alpha_span: f64,
    pub intermission_min_duration: f64,
}

impl FadeParams {
    /// `near - span / max * min(distance, max)`, rounded.
    pub fn alpha_at(&self, distance: usize) -> u8 {
        let max = self.max_distance.max(1);
        let d = distance.min(max) as f64;
        let alpha = self.alpha_near - self.alpha_span / max as f64 * d;
        alpha.round().clamp(0.0, 255.0) as u8
    }

    pub fn min_alpha(&self) -> u8 {
        self.alpha_at(self.max_distance)
    }
}

/// Derived appearance of one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinePlan {
    pub state: LineState,
    pub alpha: u8,
    /// Fade distance to the reference line after discounting blank lines.
    pub distance: usize,
}

/// Per-line states for one playback position.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Plan {
    pub lines: Vec<LinePlan>,
    /// Line the layout chain is rooted at.
    pub reference: usize,
    /// The reference line is an intermission that is currently playing.
    pub intermission: bool,
}

impl Plan {
    pub fn active_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.state == LineState::Active)
            .count()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.lines.iter().rposition(|l| l.state == LineState::Active)
    }

    /// First line that is not hidden.
    pub fn earliest_visible(&self) -> Option<usize> {
        self.lines.iter().position(|l| l.state != LineState::Hidden)
    }
}

/// Line the layout is anchored to: the last active line, else the last started line.
pub fn reference_index(lines: &[LyricLine], elapsed: f64) -> usize {
    lines
        .iter()
        .rposition(|l| l.contains(elapsed))
        .or_else(|| lines.iter().rposition(|l| l.start_time <= elapsed))
        .unwrap_or(0)
}

/// Line states and fade alphas at `elapsed`.
///
/// Depends only on its arguments, so seeking in either direction lands on the same plan.
/// `scrolled` is true while the viewport is away from the live position.
pub fn derive_plan(
    lines: &[LyricLine],
    elapsed: f64,
    scrolled: bool,
    fade: &FadeParams,
) -> Plan {
    if lines.is_empty() {
        return Plan::default();
    }
    let reference = reference_index(lines, elapsed);
    let intermission = lines[reference].contains(elapsed)
        && lines[reference].is_intermission(fade.intermission_min_duration);

    let mut states: Vec<LineState> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if line.contains(elapsed) {
                LineState::Active
            } else if elapsed < line.start_time {
                LineState::Inactive
            } else if lines
                .get(i + 1)
                .is_some_and(|next| elapsed < next.start_time)
            {
                LineState::AlmostHidden
            } else {
                LineState::Hidden
            }
        })
        .collect();
    // Keep the line above a visible reference line on screen as context.
    if reference > 0
        && !intermission
        && states[reference] != LineState::Hidden
        && states[reference - 1] == LineState::Hidden
    {
        states[reference - 1] = LineState::Inactive;
    }

    let planned = states
        .into_iter()
        .enumerate()
        .map(|(i, state)| {
            let distance = if intermission && i != reference {
                fade.max_distance
            } else {
                fade_distance(lines, i, reference)
            };
            let alpha = match state {
                LineState::Active => 255,
                LineState::AlmostHidden if !intermission => fade.alpha_at(1),
                LineState::Hidden if !scrolled && !intermission => 0,
                _ => fade.alpha_at(distance),
            };
            LinePlan {
                state,
                alpha,
                distance,
            }
        })
        .collect();

    Plan {
        lines: planned,
        reference,
        intermission,
    }
}

/// `|i - reference|` minus the blank lines strictly between them.
fn fade_distance(lines: &[LyricLine], i: usize, reference: usize) -> usize {
    let (lo, hi) = if i < reference {
        (i, reference)
    } else {
        (reference, i)
    };
    if hi - lo <= 1 {
        return hi - lo;
    }
    let blanks = lines[lo + 1..hi].iter().filter(|l| l.is_blank()).count();
    hi - lo - blanks
}

#[cfg(test)]
#[path = "../../tests/unit/lyrics/state.rs"]
mod tests;
