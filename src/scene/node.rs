use crate::{
    foundation::core::{Bounds, Rgba8},
    foundation::error::{LyricsError, LyricsResult},
    foundation::ids::{AnimationId, ContainerId, DrawableId},
    layout::spec::{ContentAlignment, LayoutSpec},
    render::backend::{ContentDesc, ContentHandle},
    text::measure::FontKind,
};

/// Kind tag of a drawable leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawableKind {
    Text,
    Image,
    ProgressBar,
}

/// Text content of a drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    pub text: String,
    pub font: FontKind,
    pub size_px: f32,
    /// Wrap to the resolved (or parent) width.
    pub wrap: bool,
}

/// Image content of a drawable; pixels are owned by the render backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePayload {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Type-specific payload of a drawable.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Text(TextPayload),
    Image(ImagePayload),
    ProgressBar { progress: f64 },
}

impl Payload {
    pub fn kind(&self) -> DrawableKind {
        match self {
            Self::Text(_) => DrawableKind::Text,
            Self::Image(_) => DrawableKind::Image,
            Self::ProgressBar { .. } => DrawableKind::ProgressBar,
        }
    }

    /// Text payload constructor.
    pub fn text(text: impl Into<String>, font: FontKind, size_px: f32, wrap: bool) -> Self {
        Self::Text(TextPayload {
            text: text.into(),
            font,
            size_px,
            wrap,
        })
    }

    /// Lines used before the first measure: the raw text on one line.
    pub(crate) fn initial_lines(&self) -> Vec<String> {
        match self {
            Self::Text(t) if !t.text.is_empty() => vec![t.text.clone()],
            _ => Vec::new(),
        }
    }

    pub(crate) fn content_desc<'a>(&'a self, lines: &'a [String]) -> ContentDesc<'a> {
        match self {
            Self::Text(t) => ContentDesc::Text {
                lines,
                font: t.font,
                size_px: t.size_px,
            },
            Self::Image(img) => ContentDesc::Image {
                source: &img.source,
                width: img.width,
                height: img.height,
            },
            Self::ProgressBar { .. } => ContentDesc::ProgressBar,
        }
    }

    pub(crate) fn validate(&self) -> LyricsResult<()> {
        match self {
            Self::Text(t) if !(t.size_px.is_finite() && t.size_px > 0.0) => Err(
                LyricsError::config(format!("font size must be finite and > 0, got {}", t.size_px)),
            ),
            Self::ProgressBar { progress } if !progress.is_finite() => {
                Err(LyricsError::config("progress must be finite"))
            }
            _ => Ok(()),
        }
    }
}

/// Non-leaf scene node.
#[derive(Clone, Debug)]
pub struct Container {
    pub(crate) parent: Option<ContainerId>,
    pub(crate) containers: Vec<ContainerId>,
    pub(crate) drawables: Vec<DrawableId>,
    pub(crate) spec: LayoutSpec,
    pub(crate) alignment: ContentAlignment,
    pub(crate) bounds: Bounds,
    pub(crate) enabled: bool,
    /// Shift applied to the children by content alignment in the last resolve.
    pub(crate) content_offset: f64,
    /// Vertical scroll applied to all descendants at render time.
    pub(crate) viewport_offset: f64,
}

impl Container {
    pub(crate) fn new(
        parent: Option<ContainerId>,
        spec: LayoutSpec,
        alignment: ContentAlignment,
    ) -> Self {
        Self {
            parent,
            containers: Vec::new(),
            drawables: Vec::new(),
            spec,
            alignment,
            bounds: Bounds::ZERO,
            enabled: true,
            content_offset: 0.0,
            viewport_offset: 0.0,
        }
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub fn containers(&self) -> &[ContainerId] {
        &self.containers
    }

    pub fn drawables(&self) -> &[DrawableId] {
        &self.drawables
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    pub fn alignment(&self) -> ContentAlignment {
        self.alignment
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn content_offset(&self) -> f64 {
        self.content_offset
    }

    pub fn viewport_offset(&self) -> f64 {
        self.viewport_offset
    }
}

/// Leaf scene node with renderable payload.
#[derive(Clone, Debug)]
pub struct Drawable {
    pub(crate) parent: ContainerId,
    pub(crate) payload: Payload,
    pub(crate) spec: LayoutSpec,
    pub(crate) bounds: Bounds,
    pub(crate) resolved: bool,
    pub(crate) enabled: bool,
    pub(crate) alpha: u8,
    pub(crate) color: Rgba8,
    pub(crate) scale: f64,
    /// Translate overlay on top of the logical y.
    pub(crate) render_offset_y: f64,
    pub(crate) animations: Vec<AnimationId>,
    /// Lines produced by the last text measure.
    pub(crate) wrapped: Vec<String>,
    pub(crate) content: Option<ContentHandle>,
}

impl Drawable {
    pub(crate) fn new(
        parent: ContainerId,
        payload: Payload,
        spec: LayoutSpec,
        wrapped: Vec<String>,
        content: ContentHandle,
    ) -> Self {
        Self {
            parent,
            payload,
            spec,
            bounds: Bounds::ZERO,
            resolved: false,
            enabled: true,
            alpha: 255,
            color: Rgba8::WHITE,
            scale: 1.0,
            render_offset_y: 0.0,
            animations: Vec::new(),
            wrapped,
            content: Some(content),
        }
    }

    pub fn kind(&self) -> DrawableKind {
        self.payload.kind()
    }

    pub fn parent(&self) -> ContainerId {
        self.parent
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    /// Logical bounds from the last resolve.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn render_offset_y(&self) -> f64 {
        self.render_offset_y
    }

    pub fn animations(&self) -> &[AnimationId] {
        &self.animations
    }

    pub fn wrapped_lines(&self) -> &[String] {
        &self.wrapped
    }

    pub fn content(&self) -> Option<ContentHandle> {
        self.content
    }
}
