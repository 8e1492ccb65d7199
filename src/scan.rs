//! Source directory scanning.
//!
//! Lists the JPEG files that the embed batch will process. The scan is
//! deliberately shallow: only files directly inside the source directory
//! count, matched by extension alone and sorted by filename so the batch
//! order (and the generated mapping) is stable across runs.
//!
//! ```text
//! images/
//! ├── 01-entrance.jpg      # included
//! ├── 02-Atrium.JPEG       # included (extension match is case-insensitive)
//! ├── cover.png            # excluded (not a JPEG)
//! ├── notes.txt            # excluded
//! └── raw/                 # excluded (subdirectories are not descended)
//! ```
//!
//! Each entry records the mapping key (filename without extension) and the
//! on-disk byte size for reporting.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// A JPEG file discovered in the source directory.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name with extension (`02-Atrium.JPEG`).
    pub filename: String,
    /// File name without extension; becomes the mapping key (`02-Atrium`).
    pub key: String,
    /// Size on disk in bytes.
    pub bytes: u64,
}

const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// List all JPEG files directly inside `source`, sorted by filename.
pub fn scan(source: &Path) -> Result<Vec<SourceImage>, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::SourceNotFound(source.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        if !is_jpeg(&path) {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        let key = Path::new(&filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.clone());
        let bytes = entry.metadata()?.len();
        images.push(SourceImage {
            path,
            filename,
            key,
            bytes,
        });
    }

    images.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(images)
}

fn is_jpeg(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    JPEG_EXTENSIONS.contains(&ext.as_str())
}
