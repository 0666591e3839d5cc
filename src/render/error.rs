use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to stage the image next to '{path}': {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move the finished image to '{path}': {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("unsupported image format '{extension}' (expected png, jpg, jpeg or bmp)")]
    UnsupportedFormat { extension: String },

    #[error("cannot render this figure: {0}")]
    InvalidConfig(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Drawing(e.to_string())
    }
}
