/// Convenience result type used across lyricflow.
pub type LyricsResult<T> = Result<T, LyricsError>;

/// Top-level error taxonomy used by scene, layout and lyrics APIs.
///
/// Every variant except [`LyricsError::Other`] describes a caller error: the triggering
/// operation is aborted and no partial state is left behind.
#[derive(thiserror::Error, Debug)]
pub enum LyricsError {
    /// Contradictory layout spec, invalid configuration or timing table.
    #[error("config error: {0}")]
    Config(String),

    /// A `relative_to` reference that is not a sibling under the same parent.
    #[error("invalid relation: {0}")]
    InvalidRelation(String),

    /// Operation requested in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Render-backend resource allocation failed.
    #[error("resource error: {0}")]
    Resource(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LyricsError {
    /// Build a [`LyricsError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LyricsError::InvalidRelation`] value.
    pub fn invalid_relation(msg: impl Into<String>) -> Self {
        Self::InvalidRelation(msg.into())
    }

    /// Build a [`LyricsError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`LyricsError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`LyricsError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LyricsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
