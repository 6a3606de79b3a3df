/// Result alias used throughout the crate.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors surfaced by the canvas engine.
///
/// Only [`CanvasError::Generation`], [`CanvasError::Capacity`] and
/// [`CanvasError::NothingToExport`] are meant to reach the user as notices; the rest describe
/// invalid input handed to an operation by the embedding UI.
#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    /// Invalid geometry, configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be loaded or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The generation backend failed or the transport broke.
    #[error("generation error: {0}")]
    Generation(String),

    /// A bounded collection is full; the attempted addition was dropped.
    #[error("capacity error: {0}")]
    Capacity(String),

    /// Export was requested but no layer is visible.
    #[error("nothing to export: no visible layers")]
    NothingToExport,

    /// Configuration (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanvasError {
    /// Build a [`CanvasError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanvasError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CanvasError::Generation`].
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`CanvasError::Capacity`].
    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    /// Build a [`CanvasError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that the UI should show to the user as a notice.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::Capacity(_) | Self::NothingToExport
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
