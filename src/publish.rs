//! Publish entry points.
//!
//! [`publish`] runs the whole pipeline: obtain a wiki checkout, mirror the
//! docs folder into it (rewriting image links in every page), then commit
//! and push. Per-file problems are collected in the returned
//! [`PublishOutput`]; only conditions that make the run meaningless are
//! returned as errors.

use crate::config::PublishConfig;
use crate::error::WikiPublishError;
use crate::output::{FileKind, FileResult, PublishOutput, PublishStats};
use crate::pipeline::discover::{discover, Discovered};
use crate::pipeline::files;
use crate::pipeline::git::Git;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Publish the configured docs folder to the wiki.
///
/// # Errors
/// Returns `Err(WikiPublishError)` only for fatal conditions:
/// - docs folder missing
/// - wiki cannot be cloned (not found, bad credentials)
/// - commit requested while `wiki_dir` is not a checkout and cloning is off
/// - every discovered file failed
/// - nothing changed in the wiki ([`WikiPublishError::NoChanges`])
/// - commit or push failed
pub async fn publish(config: &PublishConfig) -> Result<PublishOutput, WikiPublishError> {
    let total_start = Instant::now();
    info!(
        "Publishing {} to wiki checkout {} (links: {})",
        config.docs_folder.display(),
        config.wiki_dir.display(),
        config.link_mode
    );

    // ── Step 1: Validate input ───────────────────────────────────────────
    if !config.docs_folder.is_dir() {
        return Err(WikiPublishError::DocsFolderNotFound {
            path: config.docs_folder.clone(),
        });
    }

    // ── Step 2: Obtain wiki checkout ─────────────────────────────────────
    let git = prepare_checkout(config).await?;
    // Without a checkout of its own, `git -C <wiki_dir>` would act on
    // whatever repository encloses that folder.
    if config.commit && git.is_none() {
        return Err(missing_checkout(config));
    }

    // ── Step 3: Discover files ───────────────────────────────────────────
    let discovered = discover(
        &config.docs_folder,
        &config.image_extensions,
        Some(config.wiki_dir.as_path()),
    )?;
    info!(
        "Found {} markdown and {} image files",
        discovered.markdown.len(),
        discovered.images.len()
    );

    // ── Step 4: Copy images, then rewrite pages ──────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_publish_start(discovered.total());
    }
    let results = mirror_files(&discovered, config).await;

    let failed = results.iter().filter(|f| !f.is_ok()).count();
    let succeeded = results.len() - failed;
    if let Some(ref cb) = config.progress_callback {
        cb.on_publish_complete(results.len(), succeeded);
    }

    if !results.is_empty() && succeeded == 0 {
        let first_error = results
            .iter()
            .find_map(|f| f.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(WikiPublishError::AllFilesFailed {
            total: results.len(),
            first_error,
        });
    }
    if failed > 0 {
        warn!("{failed}/{} files failed to publish", results.len());
    }

    let mut stats = PublishStats {
        markdown_files: discovered.markdown.len(),
        image_files: discovered.images.len(),
        failed_files: failed,
        links_rewritten: results.iter().map(|f| f.links_rewritten).sum(),
        ..Default::default()
    };

    // ── Step 5: Commit and push ──────────────────────────────────────────
    if config.commit {
        let git = git.ok_or_else(|| missing_checkout(config))?;
        stats.commit = Some(commit_changes(&git, config).await?);
        if config.push {
            git.push().await?;
            stats.pushed = true;
        }
    }

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Publish complete: {} pages, {} images, {} links rewritten, {}ms",
        stats.markdown_files, stats.image_files, stats.links_rewritten, stats.total_duration_ms
    );

    Ok(PublishOutput {
        files: results,
        stats,
    })
}

/// Synchronous wrapper around [`publish`].
///
/// Creates a temporary tokio runtime internally.
pub fn publish_sync(config: &PublishConfig) -> Result<PublishOutput, WikiPublishError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| WikiPublishError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(publish(config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Reuse an existing checkout or clone the wiki into `wiki_dir`.
///
/// Returns `None` when cloning is disabled and no checkout exists; the
/// mirror step then simply writes into a plain directory.
async fn prepare_checkout(config: &PublishConfig) -> Result<Option<Git>, WikiPublishError> {
    let remote = config.remote();
    let existing = Git::new(&config.wiki_dir);
    if existing.is_checkout() {
        debug!("Reusing wiki checkout at {}", config.wiki_dir.display());
        return Ok(Some(match remote {
            Some(r) => existing.with_remote(r),
            None => existing,
        }));
    }
    if !config.clone {
        return Ok(None);
    }
    let remote = remote.ok_or_else(|| {
        WikiPublishError::InvalidConfig(
            "a repository (owner/repo) or wiki URL is required to clone the wiki".into(),
        )
    })?;
    Git::clone_from(&remote, &config.wiki_dir).await.map(Some)
}

/// Copy every image and rewrite every page into the wiki checkout.
///
/// Images go first so a page never references an image that is not there
/// yet if the run is interrupted between the two groups.
async fn mirror_files(discovered: &Discovered, config: &PublishConfig) -> Vec<FileResult> {
    let mut results = Vec::with_capacity(discovered.total());

    let images = stream::iter(discovered.images.iter().map(|relative| {
        let src = config.docs_folder.join(relative);
        let dest = config.wiki_dir.join(relative);
        async move {
            notify_start(config, &src);
            let outcome = files::copy_image(&src, &dest).await.map(|()| 0);
            finish(config, FileKind::Image, &src, dest, outcome)
        }
    }))
    .buffered(config.concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let pages = stream::iter(discovered.markdown.iter().map(|relative| {
        let src = config.docs_folder.join(relative);
        let dest = config.wiki_dir.join(relative);
        let context = files::link_context(config.link_mode, &config.docs_folder, relative);
        async move {
            notify_start(config, &src);
            let outcome = files::publish_markdown(&src, &dest, &context, config.link_mode).await;
            finish(config, FileKind::Markdown, &src, dest, outcome)
        }
    }))
    .buffered(config.concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    results.extend(pages);
    results.extend(images);
    results
}

fn missing_checkout(config: &PublishConfig) -> WikiPublishError {
    WikiPublishError::InvalidConfig(format!(
        "committing requires a wiki checkout, but '{}' is not one and cloning is disabled",
        config.wiki_dir.display()
    ))
}

fn notify_start(config: &PublishConfig, src: &Path) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(src);
    }
}

fn finish(
    config: &PublishConfig,
    kind: FileKind,
    src: &Path,
    destination: PathBuf,
    outcome: Result<usize, crate::error::FileError>,
) -> FileResult {
    let (links_rewritten, error) = match outcome {
        Ok(n) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_complete(src, n);
            }
            (n, None)
        }
        Err(e) => {
            warn!("{}", e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_error(src, &e.to_string());
            }
            (0, Some(e))
        }
    };
    FileResult {
        kind,
        source: src.to_path_buf(),
        destination,
        links_rewritten,
        error,
    }
}

/// Stage everything and commit; an unchanged tree is reported, not hidden.
async fn commit_changes(git: &Git, config: &PublishConfig) -> Result<String, WikiPublishError> {
    git.add_all().await?;
    if !git.has_changes().await? {
        return Err(WikiPublishError::NoChanges {
            path: config.wiki_dir.clone(),
        });
    }
    git.configure_author(&config.author_name, &config.author_email)
        .await?;
    let head = git.commit(&config.commit_message).await?;
    info!("Committed {}", head);
    Ok(head)
}
