use crate::{
    foundation::error::{LyricsError, LyricsResult},
    foundation::ids::DrawableId,
    lyrics::state::Plan,
    scene::graph::SceneGraph,
};

/// How far the viewport may move away from the live position.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollExtents {
    /// Height of the hidden stack above the earliest visible line.
    pub hidden_history: f64,
    /// From the top of the earliest visible line to the bottom of the last line.
    pub visible_remaining: f64,
}

impl ScrollExtents {
    /// Measure from the resolved logical bounds of the line drawables.
    pub fn measure(
        graph: &SceneGraph,
        drawables: &[DrawableId],
        plan: &Plan,
    ) -> LyricsResult<Self> {
        if drawables.is_empty() {
            return Ok(Self::default());
        }
        if drawables.len() != plan.lines.len() {
            return Err(LyricsError::invalid_state(format!(
                "{} line drawables but {} planned lines",
                drawables.len(),
                plan.lines.len()
            )));
        }
        let earliest = plan.earliest_visible().unwrap_or(plan.reference);
        let bounds = |i: usize| -> LyricsResult<_> {
            let node = graph.drawable_ref(drawables[i])?;
            if !node.is_resolved() {
                return Err(LyricsError::invalid_state(format!(
                    "line {i} has not been resolved"
                )));
            }
            Ok(node.bounds())
        };
        let visible_top = bounds(earliest)?.y;
        let stack_top = bounds(0)?.y;
        let last_bottom = bounds(drawables.len() - 1)?.bottom();
        Ok(Self {
            hidden_history: (visible_top - stack_top).max(0.0),
            visible_remaining: (last_bottom - visible_top).max(0.0),
        })
    }

    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(-self.hidden_history, self.visible_remaining)
    }
}

/// Vertical viewport offset of the lyrics; render y = logical y - offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollController {
    offset: f64,
    speed: f64,
    min_delta: f64,
}

impl ScrollController {
    pub fn new(speed: f64, min_delta: f64) -> Self {
        Self {
            offset: 0.0,
            speed,
            min_delta,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// True while the viewport shows the live position.
    pub fn is_live(&self) -> bool {
        self.offset == 0.0
    }

    /// Apply a scroll input. Returns `true` if the offset changed.
    pub fn on_scroll(&mut self, delta: f64, extents: ScrollExtents) -> bool {
        if !delta.is_finite() || delta.abs() < self.min_delta {
            return false;
        }
        let next = extents.clamp(self.offset + delta * self.speed);
        if next == self.offset {
            return false;
        }
        tracing::debug!(
            from = self.offset,
            to = next,
            min = -extents.hidden_history,
            max = extents.visible_remaining,
            "lyrics scroll"
        );
        self.offset = next;
        true
    }

    /// Pull the offset back inside `extents` after the layout changed.
    pub fn reclamp(&mut self, extents: ScrollExtents) -> bool {
        let next = extents.clamp(self.offset);
        let changed = next != self.offset;
        self.offset = next;
        changed
    }

    /// Return to the live position.
    pub fn snap_to_active(&mut self) -> bool {
        let changed = self.offset != 0.0;
        self.offset = 0.0;
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lyrics/scroll.rs"]
mod tests;
