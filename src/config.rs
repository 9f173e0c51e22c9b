//! Scan settings, loaded from an optional JSON file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// 3x3 filter weights, row-major
pub type Kernel = [[f32; 3]; 3];

/// Vertical edge kernel used to sharpen glyph strokes before OCR
pub const DEFAULT_KERNEL: Kernel = [[1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [1.0, 0.0, -1.0]];

/// Minimum number of letters for an image to count as localizable text
pub const DEFAULT_LETTER_THRESHOLD: usize = 2;

/// Tesseract invocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractSettings {
    /// Engine executable or the directory holding it (None = search path)
    pub path: Option<PathBuf>,
    /// Language code(s), e.g. "eng" or "eng+deu"
    pub lang: String,
    pub dpi: Option<i32>,
    /// Page segmentation mode
    pub psm: Option<i32>,
    /// OCR engine mode
    pub oem: Option<i32>,
    pub config_variables: HashMap<String, String>,
}

impl Default for TesseractSettings {
    fn default() -> Self {
        Self {
            path: None,
            lang: "eng".to_string(),
            dpi: None,
            psm: Some(3), // Fully automatic page segmentation
            oem: Some(3), // Default OCR Engine Mode
            config_variables: HashMap::new(),
        }
    }
}

/// Settings for one scan run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File name suffixes (without the dot) that select images, case-sensitive
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_kernel")]
    pub kernel: Kernel,
    #[serde(default = "default_letter_threshold")]
    pub letter_threshold: usize,
    #[serde(default)]
    pub tesseract: TesseractSettings,
    /// Skip images that fail to decode or recognize instead of aborting
    #[serde(default)]
    pub keep_going: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpeg".to_string(), "jpg".to_string()]
}

fn default_kernel() -> Kernel {
    DEFAULT_KERNEL
}

fn default_letter_threshold() -> usize {
    DEFAULT_LETTER_THRESHOLD
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            kernel: default_kernel(),
            letter_threshold: default_letter_threshold(),
            tesseract: TesseractSettings::default(),
            keep_going: false,
        }
    }
}

impl ScanConfig {
    /// File name of the per-user config under the platform config dir
    pub const FILE_NAME: &'static str = "config.json";

    /// Per-user config location, e.g. `~/.config/locscan/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(Self::FILE_NAME))
    }

    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScanError> {
        let text = std::fs::read_to_string(path).map_err(|e| ScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load an explicitly requested file, or the per-user file if present.
    ///
    /// An explicit file must be valid. Problems with the per-user file fall
    /// back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ScanError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Ok(config)
                }
                Err(err) => {
                    log::warn!("Error loading config, using defaults: {}", err);
                    Ok(Self::default())
                }
            },
            _ => Ok(Self::default()),
        }
    }
}

/// True when `file_name` ends with `.` followed by one of `extensions`
pub fn has_extension(file_name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        file_name
            .strip_suffix(ext.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    })
}
