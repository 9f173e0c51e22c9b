use std::path::PathBuf;

use clap::Parser;

use crate::config::ScanConfig;

#[derive(Parser, Debug)]
#[command(name = "locscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Identify images with text to assess localization impact", long_about = None)]
pub struct Cli {
    /// Source path containing images
    #[arg(value_name = "source_root")]
    pub source_root: PathBuf,

    /// Log directory
    #[arg(long = "logdir", value_name = "dir", default_value = ".")]
    pub log_dir: PathBuf,

    /// Tesseract executable, or the directory containing it
    #[arg(long, value_name = "path", env = "LOCSCAN_TESSERACT")]
    pub tesseract: Option<PathBuf>,

    /// JSON settings file (default: the per-user locscan config, if any)
    #[arg(long, value_name = "file")]
    pub config: Option<PathBuf>,

    /// Tesseract language, e.g. "eng" or "eng+fra"
    #[arg(long, value_name = "code")]
    pub lang: Option<String>,

    /// Minimum letter count for a YES verdict
    #[arg(long, value_name = "n")]
    pub threshold: Option<usize>,

    /// Skip images that cannot be decoded or recognized instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line overrides on top of file settings
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(path) = &self.tesseract {
            config.tesseract.path = Some(path.clone());
        }
        if let Some(lang) = &self.lang {
            config.tesseract.lang = lang.clone();
        }
        if let Some(threshold) = self.threshold {
            config.letter_threshold = threshold;
        }
        if self.keep_going {
            config.keep_going = true;
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}
