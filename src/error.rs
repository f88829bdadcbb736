use thiserror::Error;

/// Errors raised while building a scene or writing its output.
///
/// Tracing a ray never fails; everything here is detected before the first
/// pixel is rendered, or after the last one when the canvas is saved.
#[derive(Debug, Error)]
pub enum Error {
    /// A transform with a zero determinant was assigned to a shape, pattern
    /// or camera.
    #[error("transform is not invertible (determinant is zero)")]
    SingularTransform,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
