use crate::{
    animation::engine::AnimationKind,
    foundation::error::{LyricsError, LyricsResult},
    foundation::ids::{AnimationId, ContainerId, DrawableId},
    layout::spec::{ContentAlignment, LayoutSpec, Placement, PosSpec, SizeSpec},
    lyrics::scroll::{ScrollController, ScrollExtents},
    lyrics::state::{LineState, Plan, derive_plan},
    lyrics::timing::{LineAlignment, LyricLine, TimingTable},
    playback::clock::PlaybackClock,
    render::backend::RenderBackend,
    scene::graph::{SceneGraph, UiCtx},
    scene::node::Payload,
    session::config::LyricsConfig,
};

#[derive(Clone, Copy, Debug)]
struct LineSlot {
    drawable: DrawableId,
    translate: AnimationId,
    fade: AnimationId,
    scale: AnimationId,
    intermission: bool,
}

/// Scrolling lyrics bound to one song.
///
/// Owns a lines container in the scene graph with one drawable per timed line. Every
/// [`LyricsView::advance`] derives the line states from the playback position alone;
/// cached state only decides whether layout is recomputed and animations restart.
#[derive(Debug)]
pub struct LyricsView {
    container: ContainerId,
    table: TimingTable,
    config: LyricsConfig,
    slots: Vec<LineSlot>,
    plan: Plan,
    scroll: ScrollController,
    elapsed: Option<f64>,
    /// Layout must be rebuilt on the next advance.
    dirty: bool,
    /// Animations have been snapped to their first targets.
    settled: bool,
}

impl LyricsView {
    /// Create the lines container under `parent` and one drawable per line.
    #[tracing::instrument(level = "debug", skip_all, fields(lines = table.len()))]
    pub fn create(
        graph: &mut SceneGraph,
        ctx: &mut UiCtx<'_>,
        parent: ContainerId,
        table: TimingTable,
        config: LyricsConfig,
    ) -> LyricsResult<Self> {
        config.validate()?;
        table.validate()?;
        let container =
            graph.create_container(parent, LayoutSpec::fill(), ContentAlignment::Start)?;
        let mut view = Self {
            container,
            scroll: ScrollController::new(config.scroll_speed, config.min_scroll_delta),
            slots: Vec::with_capacity(table.len()),
            table,
            config,
            plan: Plan::default(),
            elapsed: None,
            dirty: true,
            settled: false,
        };
        if let Err(err) = view.populate(graph, ctx) {
            if let Err(cleanup) = graph.destroy_container(ctx.backend, container) {
                tracing::warn!(
                    error = %cleanup,
                    "failed to clean up a partially built lyrics view"
                );
            }
            return Err(err);
        }
        Ok(view)
    }

    fn populate(&mut self, graph: &mut SceneGraph, ctx: &mut UiCtx<'_>) -> LyricsResult<()> {
        let mut created: Vec<(DrawableId, bool)> = Vec::with_capacity(self.table.len());
        for (i, line) in self.table.lines().iter().enumerate() {
            let intermission = line.is_intermission(self.config.intermission_min_duration_s);
            let payload = if intermission {
                Payload::ProgressBar { progress: 0.0 }
            } else {
                Payload::text(
                    line.text.clone(),
                    self.config.font,
                    self.config.font_size_px,
                    true,
                )
            };
            // Provisional chain rooted at the first line; the first advance re-roots it.
            let prev = created.last().map(|(d, _)| *d);
            let spec = self.line_spec(i, line, intermission, 0, prev, None);
            let drawable = graph.create_drawable(ctx, payload, self.container, spec)?;
            graph.set_alpha(drawable, 0)?;
            created.push((drawable, intermission));
        }
        graph.recompute(ctx, self.container)?;

        for (drawable, intermission) in created {
            self.slots.push(LineSlot {
                drawable,
                translate: graph.attach_animation(
                    drawable,
                    AnimationKind::Translate,
                    self.config.translate_duration_s,
                )?,
                fade: graph.attach_animation(
                    drawable,
                    AnimationKind::Fade,
                    self.config.fade_duration_s,
                )?,
                scale: graph.attach_animation(
                    drawable,
                    AnimationKind::Scale,
                    self.config.scale_duration_s,
                )?,
                intermission,
            });
        }
        Ok(())
    }

    fn line_spec(
        &self,
        i: usize,
        line: &LyricLine,
        intermission: bool,
        reference: usize,
        prev: Option<DrawableId>,
        next: Option<DrawableId>,
    ) -> LayoutSpec {
        let cfg = &self.config;
        let (width, height) = if intermission {
            (
                SizeSpec::Fixed(cfg.intermission_bar_width_px),
                SizeSpec::Fixed(cfg.intermission_bar_height_px),
            )
        } else {
            (
                SizeSpec::Proportional(cfg.line_width_fraction),
                SizeSpec::Intrinsic,
            )
        };
        let x = match line.alignment {
            LineAlignment::Left => PosSpec::Offset(cfg.side_margin_px),
            LineAlignment::Center => PosSpec::Centered {
                anchor_far: false,
                offset: 0.0,
            },
            LineAlignment::Right => PosSpec::AnchoredFar(cfg.side_margin_px),
        };
        let chained = |placement, target: Option<DrawableId>| match target {
            Some(target) => (
                PosSpec::RelativeTo {
                    placement,
                    offset: cfg.line_gap_px,
                },
                Some(target),
            ),
            None => (PosSpec::Proportional(cfg.active_anchor), None),
        };
        let (y, reference) = if i == reference {
            (PosSpec::Proportional(cfg.active_anchor), None)
        } else if i > reference {
            chained(Placement::After, prev)
        } else {
            chained(Placement::Before, next)
        };
        LayoutSpec {
            width,
            height,
            x,
            y,
            reference,
            ..LayoutSpec::default()
        }
    }

    fn check_counts(&self, graph: &SceneGraph) -> LyricsResult<()> {
        let drawables = graph.container_ref(self.container)?.drawables().len();
        if drawables != self.table.len() || self.slots.len() != self.table.len() {
            return Err(LyricsError::invalid_state(format!(
                "lyrics view has {} lines but {} drawables",
                self.table.len(),
                drawables
            )));
        }
        Ok(())
    }

    /// Bring states, layout and animation targets in line with `elapsed`.
    #[tracing::instrument(level = "debug", skip(self, graph, ctx))]
    pub fn advance(
        &mut self,
        graph: &mut SceneGraph,
        ctx: &mut UiCtx<'_>,
        elapsed: f64,
    ) -> LyricsResult<()> {
        if !elapsed.is_finite() {
            return Err(LyricsError::config(format!(
                "elapsed time must be finite, got {elapsed}"
            )));
        }
        self.check_counts(graph)?;
        let plan = derive_plan(
            self.table.lines(),
            elapsed,
            !self.scroll.is_live(),
            &self.config.fade_params(),
        );

        let mut relayout = self.dirty || plan.reference != self.plan.reference;
        for (i, next) in plan.lines.iter().enumerate() {
            let prev = self.plan.lines.get(i).map_or(LineState::None, |l| l.state);
            if prev != next.state {
                tracing::debug!(line = i, from = ?prev, to = ?next.state, "line state");
                relayout = true;
            }
        }

        if relayout {
            self.relayout(graph, ctx, &plan)?;
        }
        self.retarget(graph, &plan, elapsed)?;
        if !self.settled {
            for slot in &self.slots {
                graph.snap_drawable_animations(slot.drawable)?;
            }
            self.settled = true;
        }
        self.plan = plan;
        self.elapsed = Some(elapsed);
        Ok(())
    }

    fn relayout(
        &mut self,
        graph: &mut SceneGraph,
        ctx: &mut UiCtx<'_>,
        plan: &Plan,
    ) -> LyricsResult<()> {
        let lines = self.table.lines();
        for (i, slot) in self.slots.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| self.slots[p].drawable);
            let next = self.slots.get(i + 1).map(|s| s.drawable);
            let spec = self.line_spec(i, &lines[i], slot.intermission, plan.reference, prev, next);
            graph.set_drawable_spec(slot.drawable, spec)?;
        }
        graph.recompute(ctx, self.container)?;
        self.dirty = false;

        let extents = ScrollExtents::measure(graph, &self.drawables(), plan)?;
        if self.scroll.reclamp(extents) {
            graph.set_viewport_offset(self.container, self.scroll.offset())?;
        }
        Ok(())
    }

    fn retarget(&self, graph: &mut SceneGraph, plan: &Plan, elapsed: f64) -> LyricsResult<()> {
        let cfg = &self.config;
        for ((slot, line), lp) in self.slots.iter().zip(self.table.lines()).zip(&plan.lines) {
            let active = lp.state == LineState::Active;
            let y = graph.canonical_position(slot.drawable)?.y;
            graph.set_animation_target(slot.translate, y)?;
            graph.set_animation_target(slot.fade, f64::from(lp.alpha))?;
            graph.set_animation_target(
                slot.scale,
                if active {
                    cfg.active_scale
                } else {
                    cfg.inactive_scale
                },
            )?;
            graph.set_color(
                slot.drawable,
                if active {
                    cfg.active_color
                } else {
                    cfg.inactive_color
                },
            )?;
            if slot.intermission {
                let progress = ((elapsed - line.start_time) / line.duration).clamp(0.0, 1.0);
                graph.set_progress(slot.drawable, progress)?;
            }
        }
        Ok(())
    }

    /// Step animations by `dt`, then advance to the clock's position.
    pub fn tick(
        &mut self,
        graph: &mut SceneGraph,
        ctx: &mut UiCtx<'_>,
        clock: &dyn PlaybackClock,
        dt: f64,
    ) -> LyricsResult<()> {
        graph.step_animations(dt)?;
        self.advance(graph, ctx, clock.elapsed_time())
    }

    /// Scroll through the lines. Returns `true` if the viewport moved.
    pub fn on_scroll(&mut self, graph: &mut SceneGraph, delta: f64) -> LyricsResult<bool> {
        if self.plan.lines.is_empty() {
            return Ok(false);
        }
        let extents = self.scroll_extents(graph)?;
        if !self.scroll.on_scroll(delta, extents) {
            return Ok(false);
        }
        graph.set_viewport_offset(self.container, self.scroll.offset())?;
        Ok(true)
    }

    /// Return the viewport to the live position.
    pub fn snap_to_active(&mut self, graph: &mut SceneGraph) -> LyricsResult<bool> {
        if !self.scroll.snap_to_active() {
            return Ok(false);
        }
        graph.set_viewport_offset(self.container, 0.0)?;
        Ok(true)
    }

    pub fn scroll_extents(&self, graph: &SceneGraph) -> LyricsResult<ScrollExtents> {
        ScrollExtents::measure(graph, &self.drawables(), &self.plan)
    }

    /// Force a relayout on the next advance, snapping animations (window resize, font change).
    pub fn invalidate_layout(&mut self) {
        self.dirty = true;
        self.settled = false;
    }

    /// Remove the view's nodes from the graph and release their backend content.
    pub fn destroy(self, graph: &mut SceneGraph, backend: &mut dyn RenderBackend) -> LyricsResult<()> {
        graph.destroy_container(backend, self.container)
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn table(&self) -> &TimingTable {
        &self.table
    }

    pub fn config(&self) -> &LyricsConfig {
        &self.config
    }

    /// Line drawables, in timing order.
    pub fn drawables(&self) -> Vec<DrawableId> {
        self.slots.iter().map(|s| s.drawable).collect()
    }

    pub fn line_drawable(&self, i: usize) -> Option<DrawableId> {
        self.slots.get(i).map(|s| s.drawable)
    }

    /// Plan applied by the last advance (empty before the first one).
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn line_state(&self, i: usize) -> LineState {
        self.plan.lines.get(i).map_or(LineState::None, |l| l.state)
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    pub fn is_live(&self) -> bool {
        self.scroll.is_live()
    }

    pub fn elapsed(&self) -> Option<f64> {
        self.elapsed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lyrics/view.rs"]
mod tests;
