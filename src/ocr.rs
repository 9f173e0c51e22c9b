//! OCR (Optical Character Recognition) module using rusty-tesseract

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage};
use rusty_tesseract::{Args, Image, TessError};

use crate::config::TesseractSettings;
use crate::error::ScanError;

/// Turns a preprocessed raster into text
pub trait TextExtractor {
    /// Recognize the text in `image`, which was loaded from `source`.
    ///
    /// The returned text is passed through as produced by the engine.
    fn extract_text(&self, source: &Path, image: &GrayImage) -> Result<String, ScanError>;
}

/// Text extraction backed by the system tesseract binary
pub struct TesseractExtractor {
    args: Args,
}

impl TesseractExtractor {
    pub fn new(settings: &TesseractSettings) -> Self {
        let args = Args {
            lang: settings.lang.clone(),
            config_variables: settings.config_variables.clone(),
            dpi: settings.dpi,
            psm: settings.psm,
            oem: settings.oem,
        };
        Self { args }
    }

    /// Check that tesseract can be launched, returning its version banner
    pub fn probe() -> Result<String, ScanError> {
        rusty_tesseract::get_tesseract_version()
            .map(|version| version.trim().to_string())
            .map_err(|e| ScanError::EngineUnavailable(e.to_string()))
    }
}

impl TextExtractor for TesseractExtractor {
    fn extract_text(&self, source: &Path, image: &GrayImage) -> Result<String, ScanError> {
        log::debug!(
            "Running OCR with rusty-tesseract on {}x{} image {}",
            image.width(),
            image.height(),
            source.display()
        );

        let dynamic_img = DynamicImage::ImageLuma8(image.clone());
        let tess_img =
            Image::from_dynamic_image(&dynamic_img).map_err(|e| engine_error(source, e))?;

        rusty_tesseract::image_to_string(&tess_img, &self.args).map_err(|e| engine_error(source, e))
    }
}

fn engine_error(source: &Path, err: TessError) -> ScanError {
    match err {
        TessError::TesseractNotFoundError => ScanError::EngineUnavailable(err.to_string()),
        other => ScanError::Ocr {
            path: source.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Directory that should hold the tesseract executable.
///
/// Accepts either the executable itself or the directory containing it.
pub fn engine_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

/// Put the configured engine location in front of the process search path,
/// so that rusty-tesseract finds `tesseract` there first.
///
/// Must be called from `main` before any other thread is spawned.
pub fn expose_engine(path: &Path) -> Result<(), ScanError> {
    let dir = engine_dir(path);
    if !dir.is_dir() {
        return Err(ScanError::EngineUnavailable(format!(
            "{} is not a directory or an executable inside one",
            path.display()
        )));
    }

    let mut dirs = vec![dir];
    if let Some(existing) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&existing));
    }
    let joined = std::env::join_paths(dirs)
        .map_err(|e| ScanError::EngineUnavailable(format!("invalid engine path: {}", e)))?;

    // SAFETY: only called during startup, while the process is single-threaded
    unsafe { std::env::set_var("PATH", &joined) };
    log::info!("Using tesseract from {}", path.display());
    Ok(())
}
