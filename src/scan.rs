//! Input discovery.
//!
//! Walks the input directory recursively and collects every file whose
//! extension (any case) belongs to a format with a compiled-in decoder; see
//! [`supported_input_extensions`]. Only extensions are checked here. Content
//! is sniffed later, when a worker opens the file.
//!
//! Results are sorted by path so a run over the same tree always produces the
//! same task list. Entries that cannot be read below the root are logged and
//! skipped; a root that is not a directory is an error.

use crate::imaging::supported_input_extensions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {0}")]
    NotADirectory(PathBuf),
}

/// Recursively find image files under `root`.
pub fn discover_images(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// True if the path has a recognized image extension.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|ext| supported_input_extensions().contains(&ext.as_str()))
}
