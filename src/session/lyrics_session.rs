use crate::{
    foundation::core::Bounds,
    foundation::error::LyricsResult,
    lyrics::timing::TimingTable,
    lyrics::view::LyricsView,
    playback::clock::PlaybackClock,
    render::backend::RenderBackend,
    scene::graph::{SceneGraph, UiCtx},
    session::config::LyricsConfig,
    text::measure::TextMeasurer,
};

/// Per-frame summary.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub elapsed: f64,
    pub draws: usize,
    pub active_line: Option<usize>,
    pub relaid_out: bool,
}

/// Owns the scene graph, one lyrics view and the text/render collaborators, and drives
/// them once per frame.
///
/// Frame order: resize, animation step, state advance, draw. Layout changes made during
/// the advance are visible to the same frame's draw.
#[derive(Debug)]
pub struct LyricsSession<M, B> {
    graph: SceneGraph,
    view: LyricsView,
    measurer: M,
    backend: B,
    window: Bounds,
    was_paused: bool,
    frames: u64,
}

impl<M: TextMeasurer, B: RenderBackend> LyricsSession<M, B> {
    pub fn new(
        mut measurer: M,
        mut backend: B,
        window: Bounds,
        table: TimingTable,
        config: LyricsConfig,
    ) -> LyricsResult<Self> {
        let mut graph = SceneGraph::new(window);
        graph.set_root_bounds(window)?;
        let root = graph.root();
        let view = {
            let mut ctx = UiCtx::new(&mut measurer, &mut backend);
            LyricsView::create(&mut graph, &mut ctx, root, table, config)?
        };
        Ok(Self {
            graph,
            view,
            measurer,
            backend,
            window,
            was_paused: false,
            frames: 0,
        })
    }

    /// Run one frame against `clock`, `dt` seconds after the previous one.
    #[tracing::instrument(level = "debug", skip(self, clock), fields(frame = self.frames))]
    pub fn frame(
        &mut self,
        clock: &dyn PlaybackClock,
        dt: f64,
        window: Bounds,
    ) -> LyricsResult<FrameStats> {
        let mut ctx = UiCtx::new(&mut self.measurer, &mut self.backend);

        let relaid_out = window != self.window;
        if relaid_out {
            tracing::debug!(?window, "window resized");
            self.graph.set_root_bounds(window)?;
            let root = self.graph.root();
            self.graph.recompute(&mut ctx, root)?;
            self.view.invalidate_layout();
            self.window = window;
        }

        let paused = clock.is_paused();
        if self.was_paused && !paused && self.view.config().snap_on_resume {
            self.view.snap_to_active(&mut self.graph)?;
        }
        self.was_paused = paused;

        self.view.tick(&mut self.graph, &mut ctx, clock, dt)?;
        let elapsed = clock.elapsed_time();
        let draws = self.graph.draw(&mut self.backend)?;

        let stats = FrameStats {
            frame: self.frames,
            elapsed,
            draws,
            active_line: self.view.plan().active_index(),
            relaid_out,
        };
        self.frames += 1;
        Ok(stats)
    }

    /// Forward a scroll input to the view.
    pub fn on_scroll(&mut self, delta: f64) -> LyricsResult<bool> {
        self.view.on_scroll(&mut self.graph, delta)
    }

    pub fn snap_to_active(&mut self) -> LyricsResult<bool> {
        self.view.snap_to_active(&mut self.graph)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn view(&self) -> &LyricsView {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn window(&self) -> Bounds {
        self.window
    }

    /// Destroy the view and hand back the collaborators.
    pub fn close(self) -> LyricsResult<(M, B)> {
        let Self {
            mut graph,
            view,
            measurer,
            mut backend,
            ..
        } = self;
        view.destroy(&mut graph, &mut backend)?;
        Ok((measurer, backend))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/lyrics_session.rs"]
mod tests;
