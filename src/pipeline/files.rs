//! File stage: place images and rewritten pages inside the wiki checkout.
//!
//! Every destination mirrors the source's path relative to the docs folder,
//! so `docs/guide/img/a.png` lands at `wiki-repo/guide/img/a.png`.
//!
//! Markdown is written atomically (temp file in the destination folder, then
//! rename) so an interrupted run never leaves a half-written page for the
//! commit step to pick up.

use crate::error::FileError;
use crate::pipeline::rewrite::LinkMode;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Path of `file` relative to `docs_folder`.
///
/// `.` components are ignored on both sides, so `./docs`, `docs/` and `docs`
/// name the same folder whatever spelling `glob` hands back. Returns `None`
/// when `file` is not below `docs_folder`.
pub fn relative_to(docs_folder: &Path, file: &Path) -> Option<PathBuf> {
    without_cur_dir(file)
        .strip_prefix(without_cur_dir(docs_folder))
        .ok()
        .map(Path::to_path_buf)
}

/// `path` with every `.` component removed.
pub fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Folder of a relative file as a `/`-separated string; `""` at the root.
pub fn context_path(relative: &Path) -> String {
    relative
        .parent()
        .map(slash_path)
        .unwrap_or_default()
}

/// Normal components of `path` joined with `/`.
///
/// Root, prefix and `.` components are dropped so the result is usable as a
/// literal prefix inside Markdown targets on every platform.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Context used to rewrite a page's image links.
///
/// Join mode prefixes targets with the page's own folder below the docs
/// root; strip mode removes the docs folder itself from targets written
/// relative to the repository root.
pub fn link_context(mode: LinkMode, docs_folder: &Path, relative: &Path) -> String {
    match mode {
        LinkMode::Join => context_path(relative),
        LinkMode::Strip => slash_path(docs_folder),
    }
}

/// Copy an image, creating the destination folder first.
pub async fn copy_image(src: &Path, dest: &Path) -> Result<(), FileError> {
    let copy_failed = |e: std::io::Error| FileError::CopyFailed {
        path: src.to_path_buf(),
        detail: e.to_string(),
    };
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(copy_failed)?;
    }
    tokio::fs::copy(src, dest).await.map_err(copy_failed)?;
    debug!("Copied {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Write `content` to `dest` atomically.
pub async fn write_markdown(dest: &Path, content: String) -> Result<(), FileError> {
    let path = dest.to_path_buf();
    let target = path.clone();
    match tokio::task::spawn_blocking(move || write_atomic(&target, content.as_bytes())).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(FileError::WriteFailed {
            path,
            detail: e.to_string(),
        }),
        Err(e) => Err(FileError::WriteFailed {
            path,
            detail: format!("write task failed: {e}"),
        }),
    }
}

fn write_atomic(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Read a page, rewrite its image links and write it to `dest`.
///
/// Returns the number of image targets that changed.
pub async fn publish_markdown(
    src: &Path,
    dest: &Path,
    context: &str,
    mode: LinkMode,
) -> Result<usize, FileError> {
    let content = tokio::fs::read_to_string(src)
        .await
        .map_err(|e| FileError::ReadFailed {
            path: src.to_path_buf(),
            detail: e.to_string(),
        })?;

    let rewritten = mode.apply(&content, context);
    debug!(
        "Rewrote {} image link(s) in {} (context {:?})",
        rewritten.rewritten,
        src.display(),
        context
    );

    write_markdown(dest, rewritten.content).await?;
    Ok(rewritten.rewritten)
}
