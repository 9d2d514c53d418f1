//! Lyricflow renders time-synchronised, scrolling song lyrics.
//!
//! A playback clock drives a per-line state machine whose results are expressed through a
//! small retained scene graph:
//!
//! 1. **Layout**: declarative [`LayoutSpec`]s resolve into absolute [`Bounds`] against a parent
//!    container or a sibling drawable.
//! 2. **Scene graph**: [`SceneGraph`] owns containers and drawables in arenas and issues one
//!    [`DrawCommand`] per visible leaf to a [`RenderBackend`].
//! 3. **Animation**: translate/fade/scale overlays layered on top of the resolved layout.
//! 4. **Lyrics**: [`LyricsView`] maps the clock onto [`LineState`]s, anchors the layout chain
//!    on the active line and handles scrolling through history.
//!
//! Text shaping, rasterization and audio stay behind the [`TextMeasurer`], [`RenderBackend`]
//! and [`PlaybackClock`] traits. [`LyricsSession`] ties one view and its collaborators into a
//! per-frame driver.
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod layout;
mod lyrics;
mod playback;
mod render;
mod scene;
mod session;
mod text;

pub use animation::ease::Ease;
pub use animation::engine::{Animation, AnimationKind};
pub use foundation::core::{Bounds, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{LyricsError, LyricsResult};
pub use foundation::ids::{AnimationId, ContainerId, DrawableId};
pub use layout::solver::{FixedIntrinsic, IntrinsicSize, content_alignment_offset, measure, resolve};
pub use layout::spec::{
    ContentAlignment, LayoutSpec, LayoutSpecBuilder, Placement, PosSpec, SizeSpec,
};
pub use lyrics::scroll::{ScrollController, ScrollExtents};
pub use lyrics::state::{FadeParams, LinePlan, LineState, Plan, derive_plan, reference_index};
pub use lyrics::timing::{LineAlignment, LyricLine, TimingTable};
pub use lyrics::view::LyricsView;
pub use playback::clock::{ManualClock, PlaybackClock};
pub use render::backend::{ContentDesc, ContentHandle, DrawCommand, RecordingBackend, RenderBackend};
pub use scene::graph::{NodeId, SceneGraph, UiCtx};
pub use scene::node::{Container, Drawable, DrawableKind, ImagePayload, Payload, TextPayload};
pub use session::config::LyricsConfig;
pub use session::lyrics_session::{FrameStats, LyricsSession};
pub use text::measure::{FontKind, MonospaceMeasurer, TextMeasurer, WrappedText, wrap_text};
pub use text::parley_measure::ParleyMeasurer;
