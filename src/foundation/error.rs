/// Convenience result type used across covergen.
pub type CoverResult<T> = Result<T, CoverError>;

/// Which geometry table a missing identifier was looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    /// Built-in or injected shape outlines.
    Shape,
    /// Icon outlines.
    Icon,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape => f.write_str("shape"),
            Self::Icon => f.write_str("icon"),
        }
    }
}

/// Top-level error taxonomy used by composition APIs.
#[derive(thiserror::Error, Debug)]
pub enum CoverError {
    /// Invalid theme, pattern, typography or canvas data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A motif references an identifier with no registered geometry.
    #[error("missing geometry: no {kind} registered for '{id}'")]
    MissingGeometry {
        /// Table that was searched.
        kind: GeometryKind,
        /// Identifier that was not found.
        id: String,
    },

    /// Errors raised by a drawing surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoverError {
    /// Build a [`CoverError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CoverError::MissingGeometry`] value.
    pub fn missing_geometry(kind: GeometryKind, id: impl Into<String>) -> Self {
        Self::MissingGeometry {
            kind,
            id: id.into(),
        }
    }

    /// Build a [`CoverError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CoverError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CoverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
