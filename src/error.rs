//! Error taxonomy for the scan pipeline

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while walking, preprocessing, recognizing or logging
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot list directory {}: {source}", path.display())]
    Access { path: PathBuf, source: io::Error },

    #[error("Cannot decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR failed for {}: {message}", path.display())]
    Ocr { path: PathBuf, message: String },

    #[error("Cannot write log {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl ScanError {
    /// Failures confined to a single image, which `--keep-going` may skip
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ScanError::Decode { .. } | ScanError::EmptyImage | ScanError::Ocr { .. }
        )
    }
}
