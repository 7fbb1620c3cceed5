//! Error type shared by the whole crate.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unable to load image {path:?}: {source}")]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("invalid config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("thresholds must be finite and non-negative, got ({0}, {1})")]
    InvalidThresholds(f32, f32),
    #[error("conversion failed: {0}")]
    Conversion(String),
    #[error("display failure: {0}")]
    Display(String),
    #[error("unable to encode frame: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to write report: {0}")]
    Report(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
