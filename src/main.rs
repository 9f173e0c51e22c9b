mod classify;
mod cli;
mod config;
mod error;
mod ocr;
mod pipeline;
mod preprocess;
mod report;
mod walk;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::config::ScanConfig;
use crate::ocr::TesseractExtractor;
use crate::pipeline::Scanner;
use crate::report::LogFile;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let mut config = ScanConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    if let Some(path) = &config.tesseract.path {
        ocr::expose_engine(path)?;
    }
    let version = TesseractExtractor::probe()?;
    log::info!("Found {}", version.lines().next().unwrap_or("tesseract"));

    let log = LogFile::open(&cli.log_dir)?;
    let extractor = TesseractExtractor::new(&config.tesseract);
    let summary = Scanner::new(&config, &extractor, &log, std::io::stdout().lock())
        .run(&cli.source_root)
        .with_context(|| format!("Scan of {} aborted", cli.source_root.display()))?;

    println!("Log file with details: {}", log.path().display());

    if summary.skipped > 0 {
        anyhow::bail!("{} image(s) could not be scanned", summary.skipped);
    }
    Ok(())
}
