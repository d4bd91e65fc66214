use thiserror::Error;

/// Errors that can reach the user while composing.
///
/// All of these are caught at the operation boundary and shown as a status
/// message; none of them abort the session or leave the document in a
/// half-applied state.
#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("Unsupported image type: {0} (use PNG, JPG or JPEG)")]
    UnsupportedImageType(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Editor not ready yet: the rendering surface is not initialized")]
    SurfaceMissing,

    #[error("Upload an image before exporting")]
    NoBackground,

    #[error("Failed to encode PNG: {0}")]
    PngEncode(String),

    #[error("Failed to write export file: {0}")]
    ExportWrite(#[from] std::io::Error),
}

/// Result alias used by the fallible operations.
pub type ComposerResult<T> = Result<T, ComposerError>;
