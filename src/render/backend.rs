use std::collections::BTreeSet;

use crate::{
    foundation::core::{Rect, Rgba8},
    foundation::error::{LyricsError, LyricsResult},
    foundation::ids::DrawableId,
    text::measure::FontKind,
};

/// Opaque handle to backend-owned content (glyph runs, textures, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHandle(pub u64);

/// Description of the content a drawable needs the backend to own.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentDesc<'a> {
    /// Pre-wrapped text lines.
    Text {
        lines: &'a [String],
        font: FontKind,
        size_px: f32,
    },
    /// Image identified by an opaque source key.
    Image {
        source: &'a str,
        width: u32,
        height: u32,
    },
    /// Progress bar track; the fill fraction is passed per draw.
    ProgressBar,
}

/// One leaf draw with final resolved bounds and modulation.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub drawable: DrawableId,
    pub content: ContentHandle,
    /// Final on-screen rectangle (layout + overlays + viewport scroll + scale).
    pub bounds: Rect,
    pub alpha: u8,
    pub color: Rgba8,
    pub scale: f64,
    /// Fill fraction for progress bars.
    pub progress: Option<f64>,
}

/// Render backend collaborator.
///
/// This crate never issues raw drawing calls; it only manages content lifetimes and hands
/// one [`DrawCommand`] per visible leaf to the backend.
pub trait RenderBackend {
    /// Allocate backend content. Failure aborts the creating operation.
    fn create_content(&mut self, desc: &ContentDesc<'_>) -> LyricsResult<ContentHandle>;

    /// Release content previously returned by [`RenderBackend::create_content`].
    fn destroy_content(&mut self, handle: ContentHandle);

    /// Draw one visible leaf.
    fn draw(&mut self, cmd: &DrawCommand) -> LyricsResult<()>;

    /// Called once before a frame's draw traversal.
    fn begin_frame(&mut self) {}

    /// Called once after a frame's draw traversal.
    fn end_frame(&mut self) {}
}

/// In-memory backend for tests and headless runs.
///
/// Tracks live content so double releases and leaks are observable.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_handle: u64,
    live: BTreeSet<ContentHandle>,
    capacity: Option<usize>,
    /// Content handles in release order.
    pub(crate) released: Vec<ContentHandle>,
    /// Draw commands of the last completed frame.
    pub(crate) last_frame: Vec<DrawCommand>,
    pending: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingBackend {
    /// Create an unbounded recording backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that refuses allocations beyond `capacity` live contents.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Number of live (created and not yet released) contents.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// True if `handle` is live.
    pub fn is_live(&self, handle: ContentHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Handles in release order.
    pub fn released(&self) -> &[ContentHandle] {
        &self.released
    }

    /// Draw commands of the last completed frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of completed frames.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for RecordingBackend {
    fn create_content(&mut self, desc: &ContentDesc<'_>) -> LyricsResult<ContentHandle> {
        if let Some(cap) = self.capacity
            && self.live.len() >= cap
        {
            return Err(LyricsError::resource(format!(
                "content capacity {cap} exhausted while allocating {desc:?}"
            )));
        }
        self.next_handle += 1;
        let handle = ContentHandle(self.next_handle);
        self.live.insert(handle);
        Ok(handle)
    }

    fn destroy_content(&mut self, handle: ContentHandle) {
        if !self.live.remove(&handle) {
            tracing::warn!(?handle, "release of content that is not live");
        }
        self.released.push(handle);
    }

    fn draw(&mut self, cmd: &DrawCommand) -> LyricsResult<()> {
        if !self.live.contains(&cmd.content) {
            return Err(LyricsError::invalid_state(format!(
                "draw of released content {:?}",
                cmd.content
            )));
        }
        self.pending.push(cmd.clone());
        Ok(())
    }

    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn end_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
