pub(crate) mod config;
pub(crate) mod lyrics_session;
