//! Result types returned by [`crate::publish::publish`].

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What kind of file a [`FileResult`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Markdown,
    Image,
}

/// Outcome for one discovered file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub kind: FileKind,
    /// Path below the docs folder, as discovered.
    pub source: PathBuf,
    /// Path inside the wiki checkout.
    pub destination: PathBuf,
    /// Image targets changed in this page (always 0 for images).
    pub links_rewritten: usize,
    /// Set when the file could not be published.
    pub error: Option<FileError>,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate numbers for a publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishStats {
    pub markdown_files: usize,
    pub image_files: usize,
    pub failed_files: usize,
    pub links_rewritten: usize,
    pub total_duration_ms: u64,
    /// `HEAD` after committing, when a commit was made.
    pub commit: Option<String>,
    pub pushed: bool,
}

/// Everything a publish run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOutput {
    /// Per-file results, Markdown pages first, each group in path order.
    pub files: Vec<FileResult>,
    pub stats: PublishStats,
}

impl PublishOutput {
    /// Iterator over the files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| !f.is_ok())
    }
}
