use slotmap::{SecondaryMap, SlotMap};

use crate::{
    animation::engine::Animation,
    foundation::core::{Bounds, Point, Rgba8, Vec2},
    foundation::error::{LyricsError, LyricsResult},
    foundation::ids::{AnimationId, ContainerId, DrawableId},
    layout::solver::{self, FixedIntrinsic, IntrinsicSize},
    layout::spec::{ContentAlignment, LayoutSpec},
    render::backend::{DrawCommand, RenderBackend},
    scene::node::{Container, Drawable, Payload, TextPayload},
    text::measure::{TextMeasurer, WrappedText, wrap_text},
};

/// Collaborators needed by operations that measure text or own backend content.
pub struct UiCtx<'a> {
    pub measurer: &'a mut dyn TextMeasurer,
    pub backend: &'a mut dyn RenderBackend,
}

impl<'a> UiCtx<'a> {
    pub fn new(measurer: &'a mut dyn TextMeasurer, backend: &'a mut dyn RenderBackend) -> Self {
        Self { measurer, backend }
    }
}

/// Either kind of scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
    Container(ContainerId),
    Drawable(DrawableId),
}

impl From<ContainerId> for NodeId {
    fn from(id: ContainerId) -> Self {
        Self::Container(id)
    }
}

impl From<DrawableId> for NodeId {
    fn from(id: DrawableId) -> Self {
        Self::Drawable(id)
    }
}

/// Retained tree of containers and drawables.
///
/// Nodes live in arenas and refer to each other by id, so parent links and animation
/// targets never own what they point at.
#[derive(Debug)]
pub struct SceneGraph {
    pub(crate) containers: SlotMap<ContainerId, Container>,
    pub(crate) drawables: SlotMap<DrawableId, Drawable>,
    pub(crate) animations: SlotMap<AnimationId, Animation>,
    root: ContainerId,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl SceneGraph {
    /// Create a graph whose root container covers `root_bounds`.
    pub fn new(root_bounds: Bounds) -> Self {
        let mut containers = SlotMap::with_key();
        let mut root = Container::new(None, LayoutSpec::fill(), ContentAlignment::Start);
        root.bounds = root_bounds;
        let root = containers.insert(root);
        Self {
            containers,
            drawables: SlotMap::with_key(),
            animations: SlotMap::with_key(),
            root,
        }
    }

    pub fn root(&self) -> ContainerId {
        self.root
    }

    pub fn root_bounds(&self) -> Bounds {
        self.containers
            .get(self.root)
            .map_or(Bounds::ZERO, |c| c.bounds)
    }

    /// Replace the window rectangle. Takes effect on the next `recompute`.
    pub fn set_root_bounds(&mut self, bounds: Bounds) -> LyricsResult<()> {
        if !bounds.is_finite() || bounds.w < 0.0 || bounds.h < 0.0 {
            return Err(LyricsError::config(format!(
                "root bounds must be finite and non-negative, got {bounds:?}"
            )));
        }
        let root = self.root;
        self.container_mut(root)?.bounds = bounds;
        Ok(())
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.get(id)
    }

    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub(crate) fn container_ref(&self, id: ContainerId) -> LyricsResult<&Container> {
        self.containers
            .get(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown container {id:?}")))
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> LyricsResult<&mut Container> {
        self.containers
            .get_mut(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown container {id:?}")))
    }

    pub(crate) fn drawable_ref(&self, id: DrawableId) -> LyricsResult<&Drawable> {
        self.drawables
            .get(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown drawable {id:?}")))
    }

    pub(crate) fn drawable_mut(&mut self, id: DrawableId) -> LyricsResult<&mut Drawable> {
        self.drawables
            .get_mut(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown drawable {id:?}")))
    }

    pub fn create_container(
        &mut self,
        parent: ContainerId,
        spec: LayoutSpec,
        alignment: ContentAlignment,
    ) -> LyricsResult<ContainerId> {
        spec.validate()?;
        self.container_ref(parent)?;
        let id = self
            .containers
            .insert(Container::new(Some(parent), spec, alignment));
        self.container_mut(parent)?.containers.push(id);
        Ok(id)
    }

    /// Create a leaf and its backend content. Bounds stay unresolved until `recompute`.
    pub fn create_drawable(
        &mut self,
        ctx: &mut UiCtx<'_>,
        payload: Payload,
        parent: ContainerId,
        spec: LayoutSpec,
    ) -> LyricsResult<DrawableId> {
        spec.validate()?;
        payload.validate()?;
        self.container_ref(parent)?;
        let payload = match payload {
            Payload::ProgressBar { progress } => Payload::ProgressBar {
                progress: progress.clamp(0.0, 1.0),
            },
            other => other,
        };
        let lines = payload.initial_lines();
        let handle = ctx.backend.create_content(&payload.content_desc(&lines))?;
        let id = self
            .drawables
            .insert(Drawable::new(parent, payload, spec, lines, handle));
        self.container_mut(parent)?.drawables.push(id);
        Ok(id)
    }

    pub fn set_container_spec(&mut self, id: ContainerId, spec: LayoutSpec) -> LyricsResult<()> {
        spec.validate()?;
        if id == self.root {
            return Err(LyricsError::invalid_state(
                "the root container always fills the window",
            ));
        }
        self.container_mut(id)?.spec = spec;
        Ok(())
    }

    pub fn set_drawable_spec(&mut self, id: DrawableId, spec: LayoutSpec) -> LyricsResult<()> {
        spec.validate()?;
        self.drawable_mut(id)?.spec = spec;
        Ok(())
    }

    /// Replace the text of a text drawable. Re-wrapping happens on the next `recompute`.
    pub fn set_text(&mut self, id: DrawableId, text: impl Into<String>) -> LyricsResult<()> {
        match &mut self.drawable_mut(id)?.payload {
            Payload::Text(t) => {
                t.text = text.into();
                Ok(())
            }
            other => Err(LyricsError::invalid_state(format!(
                "set_text on a {:?} drawable",
                other.kind()
            ))),
        }
    }

    pub fn set_progress(&mut self, id: DrawableId, progress: f64) -> LyricsResult<()> {
        if !progress.is_finite() {
            return Err(LyricsError::config("progress must be finite"));
        }
        match &mut self.drawable_mut(id)?.payload {
            Payload::ProgressBar { progress: p } => {
                *p = progress.clamp(0.0, 1.0);
                Ok(())
            }
            other => Err(LyricsError::invalid_state(format!(
                "set_progress on a {:?} drawable",
                other.kind()
            ))),
        }
    }

    pub fn set_color(&mut self, id: DrawableId, color: Rgba8) -> LyricsResult<()> {
        self.drawable_mut(id)?.color = color;
        Ok(())
    }

    /// Set alpha directly. An attached fade animation overrides it on its next step.
    pub fn set_alpha(&mut self, id: DrawableId, alpha: u8) -> LyricsResult<()> {
        self.drawable_mut(id)?.alpha = alpha;
        Ok(())
    }

    pub fn set_scale(&mut self, id: DrawableId, scale: f64) -> LyricsResult<()> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(LyricsError::config(format!(
                "scale must be finite and >= 0, got {scale}"
            )));
        }
        self.drawable_mut(id)?.scale = scale;
        Ok(())
    }

    pub fn set_drawable_enabled(&mut self, id: DrawableId, enabled: bool) -> LyricsResult<()> {
        self.drawable_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn set_container_enabled(&mut self, id: ContainerId, enabled: bool) -> LyricsResult<()> {
        self.container_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Vertical scroll of everything below `id`; render y = logical y - offset.
    pub fn set_viewport_offset(&mut self, id: ContainerId, offset: f64) -> LyricsResult<()> {
        if !offset.is_finite() {
            return Err(LyricsError::config("viewport offset must be finite"));
        }
        self.container_mut(id)?.viewport_offset = offset;
        Ok(())
    }

    pub fn viewport_offset(&self, id: ContainerId) -> LyricsResult<f64> {
        Ok(self.container_ref(id)?.viewport_offset)
    }

    /// True if the drawable and every ancestor container are enabled.
    pub fn is_drawable_visible(&self, id: DrawableId) -> bool {
        let Some(node) = self.drawables.get(id) else {
            return false;
        };
        if !node.enabled {
            return false;
        }
        let mut cur = Some(node.parent);
        while let Some(c) = cur {
            match self.containers.get(c) {
                Some(container) if container.enabled => cur = container.parent,
                _ => return false,
            }
        }
        true
    }

    /// Resolved logical position, without animation overlays or scrolling.
    pub fn canonical_position(&self, id: DrawableId) -> LyricsResult<Point> {
        let node = self.drawable_ref(id)?;
        if !node.resolved {
            return Err(LyricsError::invalid_state(format!(
                "drawable {id:?} has not been resolved"
            )));
        }
        Ok(node.bounds.origin())
    }

    /// Bounds as they will be drawn: logical bounds plus the translate overlay, minus every
    /// ancestor viewport offset, scaled about the centre.
    pub fn render_bounds(&self, id: DrawableId) -> LyricsResult<Bounds> {
        let node = self.drawable_ref(id)?;
        let mut scroll = 0.0;
        let mut cur = Some(node.parent);
        while let Some(c) = cur {
            let container = self.container_ref(c)?;
            scroll += container.viewport_offset;
            cur = container.parent;
        }
        Ok(Self::render_bounds_with(node, scroll))
    }

    fn render_bounds_with(node: &Drawable, scroll: f64) -> Bounds {
        node.bounds
            .translated(Vec2::new(0.0, node.render_offset_y - scroll))
            .scaled_about_center(node.scale)
    }

    /// Re-resolve `node` and everything below it.
    ///
    /// A drawable re-resolves its whole parent container, since siblings may be placed
    /// relative to it. So does a container whose parent centers or end-aligns its content.
    pub fn recompute(&mut self, ctx: &mut UiCtx<'_>, node: impl Into<NodeId>) -> LyricsResult<()> {
        self.recompute_node(ctx, node.into())
    }

    #[tracing::instrument(level = "debug", skip(self, ctx))]
    fn recompute_node(&mut self, ctx: &mut UiCtx<'_>, node: NodeId) -> LyricsResult<()> {
        match node {
            NodeId::Container(id) => {
                // An aligned parent shifts its children as a group, so realign all of them.
                match self.container_ref(id)?.parent {
                    Some(parent)
                        if self.container_ref(parent)?.alignment != ContentAlignment::Start =>
                    {
                        self.resolve_children(ctx, parent)
                    }
                    _ => self.resolve_container(ctx, id),
                }
            }
            NodeId::Drawable(id) => {
                let parent = self.drawable_ref(id)?.parent;
                self.resolve_children(ctx, parent)
            }
        }
    }

    fn resolve_container(&mut self, ctx: &mut UiCtx<'_>, id: ContainerId) -> LyricsResult<()> {
        let container = self.container_ref(id)?;
        if let Some(parent) = container.parent {
            let spec = container.spec.clone();
            let parent_bounds = self.container_ref(parent)?.bounds;
            let reference = match spec.reference {
                Some(r) if spec.uses_reference() => Some(self.sibling_bounds(r, parent)?),
                _ => None,
            };
            let mut fill = FixedIntrinsic {
                w: parent_bounds.w,
                h: parent_bounds.h,
            };
            let bounds = solver::resolve(&spec, parent_bounds, reference, &mut fill)?;
            self.container_mut(id)?.bounds = bounds;
        }
        self.resolve_children(ctx, id)
    }

    fn resolve_children(&mut self, ctx: &mut UiCtx<'_>, id: ContainerId) -> LyricsResult<()> {
        let bounds = self.container_ref(id)?.bounds;
        for d in self.drawable_order(id)? {
            self.resolve_drawable(ctx, d, bounds)?;
        }
        let children = self.container_ref(id)?.containers.clone();
        for child in children {
            self.resolve_container(ctx, child)?;
        }
        self.apply_content_alignment(id)
    }

    /// Resolved bounds of `reference`, which must be a drawable child of `parent`.
    fn sibling_bounds(&self, reference: DrawableId, parent: ContainerId) -> LyricsResult<Bounds> {
        let node = self.drawables.get(reference).ok_or_else(|| {
            LyricsError::invalid_relation(format!("relative_to target {reference:?} does not exist"))
        })?;
        if node.parent != parent {
            return Err(LyricsError::invalid_relation(format!(
                "relative_to target {reference:?} is not a sibling"
            )));
        }
        if !node.resolved {
            return Err(LyricsError::invalid_relation(format!(
                "relative_to target {reference:?} is unresolved"
            )));
        }
        Ok(node.bounds)
    }

    /// Order the drawables of `container` so every reference target precedes its users.
    fn drawable_order(&self, container: ContainerId) -> LyricsResult<Vec<DrawableId>> {
        let siblings = &self.container_ref(container)?.drawables;
        let mut marks: SecondaryMap<DrawableId, Mark> = SecondaryMap::new();
        let mut order = Vec::with_capacity(siblings.len());
        for &start in siblings {
            // Each drawable has at most one reference, so dependencies form chains.
            let mut path = Vec::new();
            let mut cur = Some(start);
            while let Some(d) = cur {
                match marks.get(d) {
                    Some(Mark::Done) => break,
                    Some(Mark::Visiting) => {
                        return Err(LyricsError::invalid_relation(format!(
                            "relative_to cycle through {d:?}"
                        )));
                    }
                    None => {}
                }
                marks.insert(d, Mark::Visiting);
                path.push(d);
                cur = self.checked_reference(d, container)?;
            }
            for d in path.into_iter().rev() {
                marks.insert(d, Mark::Done);
                order.push(d);
            }
        }
        Ok(order)
    }

    fn checked_reference(
        &self,
        id: DrawableId,
        container: ContainerId,
    ) -> LyricsResult<Option<DrawableId>> {
        let Some(reference) = self.drawable_ref(id)?.spec.reference else {
            return Ok(None);
        };
        if reference == id {
            return Err(LyricsError::invalid_relation(format!(
                "drawable {id:?} is relative to itself"
            )));
        }
        match self.drawables.get(reference) {
            Some(target) if target.parent == container => Ok(Some(reference)),
            Some(_) => Err(LyricsError::invalid_relation(format!(
                "relative_to target {reference:?} of {id:?} is not a sibling"
            ))),
            None => Err(LyricsError::invalid_relation(format!(
                "relative_to target {reference:?} of {id:?} does not exist"
            ))),
        }
    }

    fn resolve_drawable(
        &mut self,
        ctx: &mut UiCtx<'_>,
        id: DrawableId,
        parent: Bounds,
    ) -> LyricsResult<()> {
        let node = self.drawable_ref(id)?;
        let spec = node.spec.clone();
        let payload = node.payload.clone();
        let reference = match spec.reference {
            Some(r) if spec.uses_reference() => Some(self.sibling_bounds(r, node.parent)?),
            _ => None,
        };

        let (bounds, lines) = match &payload {
            Payload::Text(text) => {
                let mut intrinsic = TextIntrinsic {
                    measurer: &mut *ctx.measurer,
                    payload: text,
                    measured: None,
                };
                let bounds = solver::resolve(&spec, parent, reference, &mut intrinsic)?;
                let wrapped = match intrinsic.measured {
                    Some(wrapped) => wrapped,
                    None => wrap_text(
                        ctx.measurer,
                        &text.text,
                        text.font,
                        text.size_px,
                        text.wrap.then_some(bounds.w),
                    )?,
                };
                (bounds, Some(wrapped.lines))
            }
            Payload::Image(img) => {
                let mut natural = FixedIntrinsic {
                    w: f64::from(img.width),
                    h: f64::from(img.height),
                };
                (
                    solver::resolve(&spec, parent, reference, &mut natural)?,
                    None,
                )
            }
            Payload::ProgressBar { .. } => (
                solver::resolve(&spec, parent, reference, &mut FixedIntrinsic::default())?,
                None,
            ),
        };

        if let Some(lines) = lines {
            self.refresh_text_content(ctx.backend, id, lines)?;
        }
        let node = self.drawable_mut(id)?;
        node.bounds = bounds;
        node.resolved = true;
        Ok(())
    }

    /// Recreate backend content when the wrapped lines changed.
    fn refresh_text_content(
        &mut self,
        backend: &mut dyn RenderBackend,
        id: DrawableId,
        lines: Vec<String>,
    ) -> LyricsResult<()> {
        let node = self.drawable_ref(id)?;
        if node.wrapped == lines && node.content.is_some() {
            return Ok(());
        }
        let handle = backend.create_content(&node.payload.content_desc(&lines))?;
        let node = self.drawable_mut(id)?;
        if let Some(old) = node.content.replace(handle) {
            backend.destroy_content(old);
        }
        node.wrapped = lines;
        Ok(())
    }

    fn apply_content_alignment(&mut self, id: ContainerId) -> LyricsResult<()> {
        let container = self.container_ref(id)?;
        let (alignment, bounds) = (container.alignment, container.bounds);
        if alignment == ContentAlignment::Start {
            self.container_mut(id)?.content_offset = 0.0;
            return Ok(());
        }
        let extents = container
            .drawables
            .iter()
            .filter_map(|d| self.drawables.get(*d))
            .filter(|n| n.enabled && n.resolved)
            .map(|n| n.bounds)
            .chain(
                container
                    .containers
                    .iter()
                    .filter_map(|c| self.containers.get(*c))
                    .filter(|n| n.enabled)
                    .map(|n| n.bounds),
            );
        let mut span: Option<(f64, f64)> = None;
        for b in extents {
            span = Some(match span {
                Some((top, bottom)) => (top.min(b.y), bottom.max(b.bottom())),
                None => (b.y, b.bottom()),
            });
        }
        let offset = span.map_or(0.0, |(top, bottom)| {
            solver::content_alignment_offset(bounds, top, bottom, alignment)
        });
        if offset != 0.0 {
            self.shift_descendants(id, offset);
        }
        self.container_mut(id)?.content_offset = offset;
        Ok(())
    }

    fn shift_descendants(&mut self, id: ContainerId, dy: f64) {
        let mut stack = vec![id];
        while let Some(c) = stack.pop() {
            let Some(container) = self.containers.get(c) else {
                continue;
            };
            let drawables = container.drawables.clone();
            let children = container.containers.clone();
            for d in drawables {
                if let Some(node) = self.drawables.get_mut(d) {
                    node.bounds.y += dy;
                }
            }
            for child in children {
                if let Some(node) = self.containers.get_mut(child) {
                    node.bounds.y += dy;
                }
                stack.push(child);
            }
        }
    }

    /// Destroy a drawable, release its backend content and detach its animations.
    pub fn destroy_drawable(
        &mut self,
        backend: &mut dyn RenderBackend,
        id: DrawableId,
    ) -> LyricsResult<()> {
        let mut node = self
            .drawables
            .remove(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown drawable {id:?}")))?;
        if let Some(parent) = self.containers.get_mut(node.parent) {
            parent.drawables.retain(|&d| d != id);
        }
        if let Some(handle) = node.content.take() {
            backend.destroy_content(handle);
        }
        for anim in node.animations {
            self.animations.remove(anim);
        }
        Ok(())
    }

    /// Destroy a container and everything below it.
    pub fn destroy_container(
        &mut self,
        backend: &mut dyn RenderBackend,
        id: ContainerId,
    ) -> LyricsResult<()> {
        if id == self.root {
            return Err(LyricsError::invalid_state("the root container cannot be destroyed"));
        }
        let parent = self.container_ref(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.containers.get_mut(p)) {
            parent.containers.retain(|&c| c != id);
        }
        let mut stack = vec![id];
        while let Some(c) = stack.pop() {
            let Some(container) = self.containers.remove(c) else {
                continue;
            };
            for d in container.drawables {
                self.destroy_drawable(backend, d)?;
            }
            stack.extend(container.containers);
        }
        Ok(())
    }

    /// Depth-first draw of every enabled node. Returns the number of draw commands issued.
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> LyricsResult<usize> {
        backend.begin_frame();
        let drawn = self.draw_container(backend, self.root, 0.0);
        backend.end_frame();
        drawn
    }

    fn draw_container(
        &self,
        backend: &mut dyn RenderBackend,
        id: ContainerId,
        scroll: f64,
    ) -> LyricsResult<usize> {
        let container = self.container_ref(id)?;
        if !container.enabled {
            return Ok(0);
        }
        let scroll = scroll + container.viewport_offset;
        let mut drawn = 0;
        for &d in &container.drawables {
            let node = self.drawable_ref(d)?;
            if !node.enabled {
                continue;
            }
            if !node.resolved {
                return Err(LyricsError::invalid_state(format!(
                    "draw requested before drawable {d:?} was resolved"
                )));
            }
            if node.alpha == 0 {
                continue;
            }
            let content = node.content.ok_or_else(|| {
                LyricsError::invalid_state(format!("drawable {d:?} has no backend content"))
            })?;
            let progress = match node.payload {
                Payload::ProgressBar { progress } => Some(progress),
                _ => None,
            };
            backend.draw(&DrawCommand {
                drawable: d,
                content,
                bounds: Self::render_bounds_with(node, scroll).to_rect(),
                alpha: node.alpha,
                color: node.color,
                scale: node.scale,
                progress,
            })?;
            drawn += 1;
        }
        for &child in &container.containers {
            drawn += self.draw_container(backend, child, scroll)?;
        }
        Ok(drawn)
    }
}

/// Intrinsic size of a text payload; keeps the wrapped lines of the last measure.
struct TextIntrinsic<'m, 'p> {
    measurer: &'m mut dyn TextMeasurer,
    payload: &'p TextPayload,
    measured: Option<WrappedText>,
}

impl IntrinsicSize for TextIntrinsic<'_, '_> {
    fn intrinsic_size(&mut self, max_width: f64) -> LyricsResult<(f64, f64)> {
        let wrapped = wrap_text(
            self.measurer,
            &self.payload.text,
            self.payload.font,
            self.payload.size_px,
            self.payload.wrap.then_some(max_width),
        )?;
        let size = (wrapped.width, wrapped.height);
        self.measured = Some(wrapped);
        Ok(size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
