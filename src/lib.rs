//! # wiki-publish
//!
//! Publish a folder of Markdown documentation, with its images, to a GitHub
//! wiki.
//!
//! ## Why this crate?
//!
//! Documentation lives next to the code under a docs folder, but a GitHub
//! wiki is a separate git repository whose root *is* the wiki. Copying the
//! files across is easy; the image links are not. A page at
//! `docs/guide/setup.md` referencing `images/shot.png` or
//! `/docs/guide/images/shot.png` must point somewhere else once the page
//! lives in the wiki. This crate mirrors the tree and rewrites every
//! `![alt](target)` on the way, leaving external images alone.
//!
//! ## Pipeline Overview
//!
//! ```text
//! docs/
//!  │
//!  ├─ 1. Clone     <owner>/<repo>.wiki.git → wiki-repo/
//!  ├─ 2. Discover  **/*.md and **/*.{png,jpg,jpeg,gif,svg}
//!  ├─ 3. Images    copied to the same relative path
//!  ├─ 4. Pages     image links rewritten, written atomically
//!  └─ 5. Git       add, commit ("Update wiki content"), push
//! ```
//!
//! ## Quick Start
//!
//! The rewriter is usable on its own:
//!
//! ```rust
//! use wiki_publish::{join_image_links, rewrite_image_links};
//!
//! // Strip: root-anchored targets become relative to the wiki root.
//! assert_eq!(
//!     rewrite_image_links("![shot](/docs/guide/shot.png)", "docs"),
//!     "![shot](guide/shot.png)"
//! );
//!
//! // Join: targets are prefixed with the page's folder.
//! assert_eq!(
//!     join_image_links("![shot](images/shot.png)", "guide"),
//!     "![shot](guide/images/shot.png)"
//! );
//! ```
//!
//! Publishing a whole folder:
//!
//! ```rust,no_run
//! use wiki_publish::{publish, PublishConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PublishConfig::builder()
//!         .docs_folder("docs")
//!         .repository("octo/project")
//!         .token(std::env::var("GITHUB_TOKEN")?)
//!         .build()?;
//!     let output = publish(&config).await?;
//!     eprintln!("{} links rewritten", output.stats.links_rewritten);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `wiki-publish` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod publish;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PublishConfig, PublishConfigBuilder, DEFAULT_IMAGE_EXTENSIONS};
pub use error::{FileError, WikiPublishError};
pub use output::{FileKind, FileResult, PublishOutput, PublishStats};
pub use pipeline::rewrite::{
    classify_target, join_image_links, join_target, rewrite_image_links, rewrite_target,
    LinkMode, Rewritten, TargetKind,
};
pub use progress::{NoopProgressCallback, ProgressCallback, PublishProgressCallback};
pub use publish::{publish, publish_sync};
