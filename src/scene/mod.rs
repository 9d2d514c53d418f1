//! Retained scene graph: containers own drawables, layout is resolved on demand.

pub(crate) mod graph;
pub(crate) mod node;
