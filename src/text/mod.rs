//! Text measurement collaborator interface, line wrapping, and measurer implementations.

pub(crate) mod measure;
pub(crate) mod parley_measure;
