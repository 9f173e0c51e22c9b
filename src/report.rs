//! Append-only result log

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// `log.txt` inside a log directory that is created on demand
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub const FILE_NAME: &'static str = "log.txt";

    /// Create `log_dir` (and missing parents) and resolve the log path
    pub fn open(log_dir: &Path) -> Result<Self, ScanError> {
        fs::create_dir_all(log_dir).map_err(|source| ScanError::Io {
            path: log_dir.to_path_buf(),
            source,
        })?;
        let dir = std::path::absolute(log_dir).map_err(|source| ScanError::Io {
            path: log_dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: dir.join(Self::FILE_NAME),
        })
    }

    /// Absolute path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. The file is reopened per call so each record is on
    /// disk before the next image is processed.
    pub fn append(&self, record: &str) -> Result<(), ScanError> {
        let io_err = |source| ScanError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(record.as_bytes()).map_err(io_err)
    }
}
