/// Convenience result type used across annorender.
pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// Top-level error taxonomy for the annotated render output stage.
///
/// Only [`AnnotateError::Config`] is meant to end a render. Everything else is recovered
/// locally (logged and skipped) or reported through a write future.
#[derive(thiserror::Error, Debug)]
pub enum AnnotateError {
    /// Setup configuration that cannot produce correct output (missing filename tokens, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// Mesh or skeleton sampling failed for one object.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// A sidecar file or its parent directory could not be written.
    #[error("sidecar error: {0}")]
    Sidecar(String),

    /// Pixel conversion, compositing or image encoding failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// The host cancelled the render while a frame was in flight.
    #[error("render cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnnotateError {
    /// Build an [`AnnotateError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`AnnotateError::Sampling`] value.
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Build an [`AnnotateError::Sidecar`] value.
    pub fn sidecar(msg: impl Into<String>) -> Self {
        Self::Sidecar(msg.into())
    }

    /// Build an [`AnnotateError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Return `true` for errors that must abort the render.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Cancelled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
