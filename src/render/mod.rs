//! Render-backend collaborator boundary.

pub(crate) mod backend;
