//! Declarative layout: [`spec::LayoutSpec`] describes how a node derives its bounds and
//! [`solver::resolve`] turns a spec plus parent/reference bounds into resolved bounds.

pub(crate) mod solver;
pub(crate) mod spec;
