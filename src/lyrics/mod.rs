//! Time-synchronised lyric lines: timing table, per-line state machine, view and scrolling.

pub(crate) mod scroll;
pub(crate) mod state;
pub(crate) mod timing;
pub(crate) mod view;
