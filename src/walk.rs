//! Recursive discovery of image files under a source root

use std::borrow::Cow;
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use crate::config::has_extension;
use crate::error::ScanError;

/// A regular file selected by the extension filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the file
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    /// Bare file name, lossily converted for display
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }
}

/// Lazy depth-first walk yielding files whose names end in one of `extensions`.
///
/// Directories are opened only when the walk reaches them. A directory that
/// cannot be listed yields an [`ScanError::Access`] item. Symlinked
/// directories are not descended into.
pub struct ImageFiles {
    extensions: Vec<String>,
    pending: Vec<PathBuf>,
    current: Option<(PathBuf, ReadDir)>,
}

impl ImageFiles {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
            pending: vec![root.into()],
            current: None,
        }
    }

    fn selects(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| has_extension(&name.to_string_lossy(), &self.extensions))
    }
}

impl Iterator for ImageFiles {
    type Item = Result<ImageFile, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let dir = self.pending.pop()?;
                match fs::read_dir(&dir) {
                    Ok(entries) => self.current = Some((dir, entries)),
                    Err(source) => return Some(Err(ScanError::Access { path: dir, source })),
                }
            }
            let Some((dir, entries)) = self.current.as_mut() else {
                continue;
            };

            let entry = match entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(source)) => {
                    let path = dir.clone();
                    self.current = None;
                    return Some(Err(ScanError::Access { path, source }));
                }
                None => {
                    self.current = None;
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(source) => return Some(Err(ScanError::Access { path, source })),
            };

            if file_type.is_dir() {
                self.pending.push(path);
            } else if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
                && self.selects(&path)
            {
                return Some(Ok(ImageFile { path }));
            }
        }
    }
}
