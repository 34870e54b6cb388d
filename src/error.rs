use thiserror::Error;

/// Errors from the fallible edges of the sketchpad: configuration, fonts and export.
///
/// Document, tool and pointer operations never fail; they are no-ops on empty
/// preconditions instead.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

pub type SketchResult<T> = Result<T, SketchError>;
