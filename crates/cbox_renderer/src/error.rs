//! Error type for scene construction, session setup and image export.

use thiserror::Error;

/// Errors reported by the renderer.
///
/// The radiance hot path never returns these; it degrades to zero radiance.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Material id {id} is out of range (scene has {count} materials)")]
    MaterialOutOfRange { id: usize, count: usize },

    #[error("Area light material {0} has no emission")]
    LightNotEmissive(usize),

    #[error("Accumulation buffer has no completed iterations")]
    NoIterations,

    #[error("Buffer size mismatch: expected {expected} pixels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
