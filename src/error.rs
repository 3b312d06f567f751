use thiserror::Error;

/// Errors raised at the edges of the gallery: loading sources, reading
/// input lines, persisting the theme and writing rendered frames.
///
/// The controller itself never fails; degenerate states are no-ops.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid preference file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid image source: {0}")]
    InvalidSource(String),

    #[error("unrecognised input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
