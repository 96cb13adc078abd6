//! Error types for the wiki-publish library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`WikiPublishError`]: **Fatal**: the publish cannot proceed or its
//!   result cannot be recorded (docs folder missing, wiki not initialised,
//!   bad token, nothing to commit). Returned as `Err(WikiPublishError)` from
//!   [`crate::publish::publish`].
//!
//! * [`FileError`]: **Non-fatal**: a single page or image could not be
//!   read, copied or written, while the rest of the tree is fine. Stored
//!   inside [`crate::output::FileResult`] so callers can inspect partial
//!   success.
//!
//! No message produced here ever contains the access token; git output is
//! redacted before it is wrapped.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the wiki-publish library.
#[derive(Debug, Error)]
pub enum WikiPublishError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The configured docs folder does not exist or is not a directory.
    #[error("Docs folder not found: '{path}'\nCheck the docs-folder input points at an existing directory.")]
    DocsFolderNotFound { path: PathBuf },

    /// A discovery pattern could not be compiled.
    #[error("Invalid file pattern '{pattern}': {detail}")]
    InvalidPattern { pattern: String, detail: String },

    // ── Wiki / git errors ─────────────────────────────────────────────────
    /// The wiki repository does not exist yet.
    #[error("Wiki repository not found: '{url}'\nGitHub only creates the wiki repository after the first page is saved in the web UI.")]
    WikiNotFound { url: String },

    /// The remote rejected the credentials.
    #[error("Authentication failed for '{url}'\nCheck that the github-token input is set and has write access to the repository.")]
    AuthenticationFailed { url: String },

    /// A git command exited unsuccessfully for any other reason.
    #[error("git {command} failed (exit code {code:?}): {stderr}")]
    GitFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The `git` executable could not be started.
    #[error("Could not run git: {0}\nInstall git and make sure it is on PATH.")]
    GitUnavailable(String),

    /// Publishing produced no change in the wiki checkout.
    #[error("No changes to commit in '{path}'; the wiki is already up to date")]
    NoChanges { path: PathBuf },

    // ── File errors ───────────────────────────────────────────────────────
    /// Every discovered file failed; nothing would be published.
    #[error("All {total} files failed to publish.\nFirst error: {first_error}")]
    AllFilesFailed { total: usize, first_error: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WikiPublishError {
    /// `true` for [`WikiPublishError::NoChanges`], which callers usually
    /// report as a warning rather than a failure.
    pub fn is_no_changes(&self) -> bool {
        matches!(self, WikiPublishError::NoChanges { .. })
    }
}

/// A non-fatal error for a single file.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum FileError {
    /// The source page could not be read (missing, unreadable, not UTF-8).
    #[error("{}: read failed: {detail}", .path.display())]
    ReadFailed { path: PathBuf, detail: String },

    /// The rewritten page could not be written into the wiki checkout.
    #[error("{}: write failed: {detail}", .path.display())]
    WriteFailed { path: PathBuf, detail: String },

    /// An image could not be copied into the wiki checkout.
    #[error("{}: copy failed: {detail}", .path.display())]
    CopyFailed { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_files_failed_display() {
        let e = WikiPublishError::AllFilesFailed {
            total: 3,
            first_error: "docs/a.md: read failed: denied".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("All 3 files"), "got: {msg}");
        assert!(msg.contains("docs/a.md"));
    }

    #[test]
    fn git_failed_display() {
        let e = WikiPublishError::GitFailed {
            command: "push".into(),
            code: Some(1),
            stderr: "rejected".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("git push"));
        assert!(msg.contains("rejected"));
    }

    #[test]
    fn wiki_not_found_mentions_web_ui() {
        let e = WikiPublishError::WikiNotFound {
            url: "https://github.com/a/b.wiki.git".into(),
        };
        assert!(e.to_string().contains("first page"));
    }

    #[test]
    fn no_changes_is_flagged() {
        let e = WikiPublishError::NoChanges {
            path: PathBuf::from("wiki-repo"),
        };
        assert!(e.is_no_changes());
        assert!(!WikiPublishError::Internal("x".into()).is_no_changes());
    }

    #[test]
    fn file_error_display() {
        let e = FileError::CopyFailed {
            path: PathBuf::from("docs/img/a.png"),
            detail: "No such file or directory".into(),
        };
        assert_eq!(
            e.to_string(),
            "docs/img/a.png: copy failed: No such file or directory"
        );
    }
}
