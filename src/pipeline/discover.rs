//! File discovery: enumerate the Markdown pages and images below the docs
//! folder.
//!
//! The docs folder is escaped with [`glob::Pattern::escape`] before it is
//! spliced into a pattern, so a folder called `docs[v2]` is matched
//! literally. Hidden path components (`.git`, `.github`, …) never match.
//!
//! Results are paths relative to the docs folder. `glob` normalises the
//! spelling of its results (`./docs/**/*.md` yields `docs/a.md`), so callers
//! join these relative paths onto their own roots instead of re-deriving them.

use crate::error::WikiPublishError;
use crate::pipeline::files::relative_to;
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files found below the docs folder, relative to it, each list sorted and
/// de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub markdown: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
}

impl Discovered {
    pub fn total(&self) -> usize {
        self.markdown.len() + self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Collect `**/*.md` and `**/*.<ext>` for every image extension below
/// `docs_folder`, skipping anything inside `exclude`.
///
/// `exclude` is compared after resolving both sides on disk, so a relative
/// wiki directory is recognised below an absolute docs folder and the other
/// way round. An `exclude` that does not exist yet cannot contain anything.
pub fn discover(
    docs_folder: &Path,
    image_extensions: &[String],
    exclude: Option<&Path>,
) -> Result<Discovered, WikiPublishError> {
    // `components()` drops trailing and repeated separators (`docs/` → `docs`).
    let root: PathBuf = docs_folder.components().collect();
    let root = Pattern::escape(&root.to_string_lossy());
    let exclude = exclude.and_then(|dir| std::fs::canonicalize(dir).ok());
    let exclude = exclude.as_deref();

    let markdown = collect(docs_folder, &format!("{root}/**/*.md"), exclude)?;

    let mut images = Vec::new();
    for ext in image_extensions {
        let ext = ext.trim_start_matches('.');
        images.extend(collect(docs_folder, &format!("{root}/**/*.{ext}"), exclude)?);
    }
    images.sort();
    images.dedup();

    debug!(
        "Discovered {} markdown and {} image files in {}",
        markdown.len(),
        images.len(),
        docs_folder.display()
    );
    Ok(Discovered { markdown, images })
}

fn collect(
    docs_folder: &Path,
    pattern: &str,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, WikiPublishError> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob_with(pattern, options).map_err(|e| WikiPublishError::InvalidPattern {
        pattern: pattern.to_string(),
        detail: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(p) => p,
            // Unreadable directories are skipped, matching `find`-style tools.
            Err(e) => {
                debug!("Skipping unreadable path: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if let Some(dir) = exclude {
            if std::fs::canonicalize(&path).is_ok_and(|p| p.starts_with(dir)) {
                continue;
            }
        }
        match relative_to(docs_folder, &path) {
            Some(rel) => files.push(rel),
            None => warn!(
                "Skipping {}: not below {}",
                path.display(),
                docs_folder.display()
            ),
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
