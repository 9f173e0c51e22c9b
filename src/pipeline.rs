//! Drives walk, preprocessing, OCR, classification and logging for a tree

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::classify::{Verdict, classify};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::ocr::TextExtractor;
use crate::preprocess::{load_image, preprocess};
use crate::report::LogFile;
use crate::walk::{ImageFile, ImageFiles};

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: usize,
    pub with_impact: usize,
    pub without_impact: usize,
    /// Images skipped after a per-file failure (`keep_going` only)
    pub skipped: usize,
}

/// Sequential scanner: one image is fully processed before the next
pub struct Scanner<'a, E: TextExtractor, W: Write> {
    config: &'a ScanConfig,
    extractor: &'a E,
    log: &'a LogFile,
    out: W,
}

impl<'a, E: TextExtractor, W: Write> Scanner<'a, E, W> {
    /// `out` receives each record as it is produced (stdout in the binary)
    pub fn new(config: &'a ScanConfig, extractor: &'a E, log: &'a LogFile, out: W) -> Self {
        Self {
            config,
            extractor,
            log,
            out,
        }
    }

    /// Scan every matching image under `root`.
    ///
    /// Stops at the first error unless `keep_going` is set, in which case
    /// decode and OCR failures are skipped and counted.
    pub fn run(&mut self, root: &Path) -> Result<ScanSummary, ScanError> {
        log::info!("Scanning {}", root.display());
        let mut summary = ScanSummary::default();

        for item in ImageFiles::new(root, &self.config.extensions) {
            let file = item?;
            match self.process(&file) {
                Ok(verdict) => {
                    summary.scanned += 1;
                    match verdict {
                        Verdict::Yes => summary.with_impact += 1,
                        Verdict::No => summary.without_impact += 1,
                    }
                }
                Err(err) if self.config.keep_going && err.is_per_file() => {
                    log::error!("Skipping {}: {}", file.path().display(), err);
                    summary.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "Scanned {} images ({} with text, {} without, {} skipped)",
            summary.scanned,
            summary.with_impact,
            summary.without_impact,
            summary.skipped
        );
        Ok(summary)
    }

    fn process(&mut self, file: &ImageFile) -> Result<Verdict, ScanError> {
        let text = {
            let image = load_image(file.path())?;
            let prepared = preprocess(&image, &self.config.kernel)?;
            self.extractor.extract_text(file.path(), &prepared)?
        };

        let classification = classify(&text, self.config.letter_threshold);
        log::debug!(
            "{} in {}: {} letters",
            file.file_name(),
            file.dir().display(),
            classification.letter_count
        );

        let record = classification.record(&file.file_name());
        self.out
            .write_all(record.as_bytes())
            .map_err(|source| ScanError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        self.log.append(&record)?;
        Ok(classification.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage};
    use std::collections::HashMap;
    use std::fs;

    /// Returns canned text keyed by file name
    struct CannedText(HashMap<String, String>);

    impl CannedText {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl TextExtractor for CannedText {
        fn extract_text(&self, source: &Path, _image: &GrayImage) -> Result<String, ScanError> {
            let name = source.file_name().unwrap().to_string_lossy().into_owned();
            Ok(self.0.get(&name).cloned().unwrap_or_default())
        }
    }

    struct Unreachable;

    impl TextExtractor for Unreachable {
        fn extract_text(&self, _source: &Path, _image: &GrayImage) -> Result<String, ScanError> {
            Err(ScanError::EngineUnavailable("tesseract not found".to_string()))
        }
    }

    fn write_image(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(8, 8, Rgb([250, 250, 250]))
            .save(path)
            .unwrap();
    }

    fn scan<E: TextExtractor>(
        config: &ScanConfig,
        extractor: &E,
        root: &Path,
        log_dir: &Path,
    ) -> (Result<ScanSummary, ScanError>, String) {
        let log = LogFile::open(log_dir).unwrap();
        let mut out = Vec::new();
        let result = Scanner::new(config, extractor, &log, &mut out).run(root);
        (result, String::from_utf8(out).unwrap())
    }

    fn log_lines(log_dir: &Path) -> Vec<String> {
        fs::read_to_string(log_dir.join("log.txt"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_text_image_has_impact() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        write_image(&root.join("photo.jpg"));
        let log_dir = tmp.path().join("logs");

        let (result, out) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[("photo.jpg", "Hello")]),
            &root,
            &log_dir,
        );

        let summary = result.unwrap();
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.with_impact, 1);
        let log = fs::read_to_string(log_dir.join("log.txt")).unwrap();
        assert_eq!(log, "photo.jpg : Loc Impact - YES\n");
        assert_eq!(out, log);
    }

    #[test]
    fn test_empty_text_has_no_impact() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        write_image(&root.join("icon.png"));
        let log_dir = tmp.path().join("logs");

        let (result, _) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[("icon.png", "")]),
            &root,
            &log_dir,
        );

        assert_eq!(result.unwrap().without_impact, 1);
        assert_eq!(log_lines(&log_dir), vec!["icon.png : Loc Impact - NO"]);
    }

    #[test]
    fn test_non_images_produce_no_record() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "Hello there").unwrap();
        fs::write(root.join("b.PNG"), "upper case").unwrap();
        let log_dir = tmp.path().join("logs");

        let (result, out) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[]),
            &root,
            &log_dir,
        );

        assert_eq!(result.unwrap(), ScanSummary::default());
        assert!(out.is_empty());
        assert!(log_lines(&log_dir).is_empty());
    }

    #[test]
    fn test_missing_log_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        write_image(&root.join("nested/banner.jpeg"));
        let log_dir = tmp.path().join("does/not/exist");
        assert!(!log_dir.exists());

        let (result, _) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[("banner.jpeg", "Sale")]),
            &root,
            &log_dir,
        );

        result.unwrap();
        assert!(log_dir.is_dir());
        assert_eq!(log_lines(&log_dir), vec!["banner.jpeg : Loc Impact - YES"]);
    }

    #[test]
    fn test_record_count_matches_image_count() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        let images = ["a.png", "b.jpg", "c.jpeg", "deep/d.png", "deep/er/e.jpg"];
        for name in images {
            write_image(&root.join(name));
        }
        fs::write(root.join("deep/readme.md"), "docs").unwrap();
        let log_dir = tmp.path().join("logs");

        let (result, _) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[("a.png", "Title"), ("d.png", "x")]),
            &root,
            &log_dir,
        );

        let summary = result.unwrap();
        assert_eq!(summary.scanned, images.len());
        assert_eq!(summary.with_impact, 1);
        assert_eq!(summary.without_impact, 4);
        assert_eq!(log_lines(&log_dir).len(), images.len());
    }

    #[test]
    fn test_second_run_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        write_image(&root.join("one.png"));
        write_image(&root.join("two.jpg"));
        let log_dir = tmp.path().join("logs");
        let extractor = CannedText::new(&[("one.png", "OK")]);
        let config = ScanConfig::default();

        scan(&config, &extractor, &root, &log_dir).0.unwrap();
        let first = log_lines(&log_dir);
        scan(&config, &extractor, &root, &log_dir).0.unwrap();
        let second = log_lines(&log_dir);

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2 * first.len());
    }

    #[test]
    fn test_corrupt_image_aborts_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("broken.png"), b"not an image").unwrap();
        let log_dir = tmp.path().join("logs");

        let (result, _) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[]),
            &root,
            &log_dir,
        );

        assert!(matches!(result, Err(ScanError::Decode { .. })));
        assert!(log_lines(&log_dir).is_empty());
    }

    #[test]
    fn test_keep_going_skips_corrupt_image() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("broken.png"), b"not an image").unwrap();
        write_image(&root.join("good.png"));
        let log_dir = tmp.path().join("logs");
        let config = ScanConfig {
            keep_going: true,
            ..ScanConfig::default()
        };

        let (result, _) = scan(
            &config,
            &CannedText::new(&[("good.png", "Menu")]),
            &root,
            &log_dir,
        );

        let summary = result.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.scanned, 1);
        assert_eq!(log_lines(&log_dir), vec!["good.png : Loc Impact - YES"]);
    }

    #[test]
    fn test_engine_unavailable_is_fatal_even_with_keep_going() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        write_image(&root.join("a.png"));
        let log_dir = tmp.path().join("logs");
        let config = ScanConfig {
            keep_going: true,
            ..ScanConfig::default()
        };

        let (result, _) = scan(&config, &Unreachable, &root, &log_dir);
        assert!(matches!(result, Err(ScanError::EngineUnavailable(_))));
    }

    #[test]
    fn test_custom_threshold_and_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        write_image(&root.join("a.png"));
        write_image(&root.join("b.jpg"));
        let log_dir = tmp.path().join("logs");
        let config = ScanConfig {
            extensions: vec!["png".to_string()],
            letter_threshold: 5,
            ..ScanConfig::default()
        };

        let (result, _) = scan(
            &config,
            &CannedText::new(&[("a.png", "Sale"), ("b.jpg", "Clearance")]),
            &root,
            &log_dir,
        );

        assert_eq!(result.unwrap().scanned, 1);
        assert_eq!(log_lines(&log_dir), vec!["a.png : Loc Impact - NO"]);
    }

    #[test]
    fn test_missing_root_is_access_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root: PathBuf = tmp.path().join("nowhere");
        let (result, _) = scan(
            &ScanConfig::default(),
            &CannedText::new(&[]),
            &root,
            &tmp.path().join("logs"),
        );
        assert!(matches!(result, Err(ScanError::Access { .. })));
    }
}
