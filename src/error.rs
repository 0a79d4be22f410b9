use thiserror::Error;

use crate::renderer::TextureId;

/// Errors raised by the rendering core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The camera position is recovered from the inverse view matrix, which doesn't exist.
    #[error("view matrix is not invertible, camera position can't be recovered")]
    SingularViewMatrix,

    #[error("texture {0:?} is not registered")]
    UnknownTexture(TextureId),

    #[error("vertex range {start}..{end} is outside of a buffer of {len} vertices")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("texture of {width}x{height} needs {expected} floats, got {actual}")]
    InvalidTextureSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
