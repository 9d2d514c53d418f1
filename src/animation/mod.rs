//! Time-driven overlays (translate, fade, scale) on top of resolved layout.

pub(crate) mod ease;
pub(crate) mod engine;
