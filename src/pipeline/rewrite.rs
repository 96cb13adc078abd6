//! Image-link rewriting for documents relocated into the wiki tree.
//!
//! A GitHub wiki is a flat repository whose root is the wiki itself, while
//! the source documentation lives below a docs folder of the main
//! repository. Image references written for the source tree therefore need
//! their targets adjusted once the Markdown lands in the wiki checkout.
//!
//! Two directions are supported and the caller picks one through
//! [`LinkMode`]:
//!
//! * [`LinkMode::Strip`] via [`rewrite_image_links`]: remove the context path
//!   from root-anchored (`/docs/img.png`) and context-prefixed
//!   (`docs/img.png`) targets so they resolve from the wiki root.
//! * [`LinkMode::Join`] via [`join_image_links`]: prepend the document's folder
//!   to every local target so pages that the wiki renders at its root still
//!   find images stored in sub-folders.
//!
//! External targets (anything starting with `http`) are never touched in
//! either direction.
//!
//! ## Classification order
//!
//! Strip-mode rules run in a fixed order and the first match wins:
//!
//! 1. `http…`            → unchanged
//! 2. `/…`               → leading slashes and the context prefix removed
//! 3. `<context>/…`      → context prefix removed (same result as rule 2)
//! 4. `./…` or `../…`    → unchanged
//! 5. anything else      → unchanged
//!
//! The context path is matched with literal prefix checks and slicing, never
//! by building a pattern from it, so folder names containing `.`, `*`, `(`,
//! `[` and friends behave as plain text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// `![alt](target)` where alt has no `]` and target has no `)`.
/// Neither part may span a line break.
static RE_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]\n]*)\]\(([^)\n]*)\)").unwrap());

// ── Classification ───────────────────────────────────────────────────────────

/// How an image target is interpreted before rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Starts with `http` (covers `http://` and `https://`).
    External,
    /// Starts with one or more `/`, resolved from the docs root.
    RootAnchored,
    /// Starts with `./` or `../`, resolved from the document's own folder.
    DotRelative,
    /// Any other local path.
    Bare,
}

/// Classify a single image target. The order of checks is significant:
/// a target such as `/http.png` is root-anchored, not external.
pub fn classify_target(target: &str) -> TargetKind {
    if target.starts_with("http") {
        TargetKind::External
    } else if target.starts_with('/') {
        TargetKind::RootAnchored
    } else if target.starts_with("./") || target.starts_with("../") {
        TargetKind::DotRelative
    } else {
        TargetKind::Bare
    }
}

// ── Link mode ────────────────────────────────────────────────────────────────

/// Direction in which local image targets are adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Prefix local targets with the document's folder (relative to the docs
    /// root). This is what a flat wiki needs for pages kept in sub-folders.
    #[default]
    Join,
    /// Strip the context path from root-anchored and context-prefixed
    /// targets, leaving dot-relative and plain relative targets alone.
    Strip,
}

impl LinkMode {
    /// Rewrite every image reference in `document` and report how many
    /// targets actually changed.
    pub fn apply(self, document: &str, context: &str) -> Rewritten {
        let mut rewritten = 0usize;
        let content = RE_IMAGE
            .replace_all(document, |caps: &Captures<'_>| {
                let target = &caps[2];
                let new_target = self.rewrite_target(target, context);
                if new_target != target {
                    rewritten += 1;
                }
                format!("![{}]({})", &caps[1], new_target)
            })
            .into_owned();
        Rewritten { content, rewritten }
    }

    /// Apply this mode to a single target.
    pub fn rewrite_target<'a>(self, target: &'a str, context: &str) -> Cow<'a, str> {
        match self {
            LinkMode::Strip => Cow::Borrowed(rewrite_target(target, context)),
            LinkMode::Join => join_target(target, context),
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkMode::Join => f.write_str("join"),
            LinkMode::Strip => f.write_str("strip"),
        }
    }
}

impl FromStr for LinkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "join" => Ok(LinkMode::Join),
            "strip" => Ok(LinkMode::Strip),
            other => Err(format!("unknown link mode '{other}' (expected 'join' or 'strip')")),
        }
    }
}

/// Result of [`LinkMode::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The document with its image targets adjusted.
    pub content: String,
    /// Number of image references whose target changed.
    pub rewritten: usize,
}

// ── Strip direction ──────────────────────────────────────────────────────────

/// Rewrite all image references so they resolve from the wiki root, stripping
/// `context` from root-anchored and context-prefixed targets.
///
/// ```rust
/// use wiki_publish::rewrite_image_links;
///
/// let doc = "See ![diagram](/docs/subfolder/images/test.png) above.";
/// assert_eq!(
///     rewrite_image_links(doc, "docs"),
///     "See ![diagram](subfolder/images/test.png) above."
/// );
/// ```
pub fn rewrite_image_links(document: &str, context: &str) -> String {
    LinkMode::Strip.apply(document, context).content
}

/// Strip-mode rewrite of a single target.
pub fn rewrite_target<'a>(target: &'a str, context: &str) -> &'a str {
    match classify_target(target) {
        TargetKind::External | TargetKind::DotRelative => target,
        TargetKind::RootAnchored => {
            let path = target.trim_start_matches('/');
            strip_context(path, context).unwrap_or(path)
        }
        TargetKind::Bare => strip_context(target, context).unwrap_or(target),
    }
}

/// Remove `context` from the front of `path` when it ends at a segment
/// boundary, together with the single `/` that follows it.
///
/// Returns `None` when `path` does not start with the context folder. Slashes
/// around the context itself are ignored so `"/docs/"` and `"docs"` match
/// the same paths.
fn strip_context<'a>(path: &'a str, context: &str) -> Option<&'a str> {
    let context = context.trim_matches('/');
    if context.is_empty() {
        return None;
    }
    let rest = path.strip_prefix(context)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix('/')
}

// ── Join direction ───────────────────────────────────────────────────────────

/// Rewrite all local image references by joining them onto `context`.
///
/// ```rust
/// use wiki_publish::join_image_links;
///
/// assert_eq!(
///     join_image_links("![Test Image](images/test.png)", "docs/subfolder"),
///     "![Test Image](docs/subfolder/images/test.png)"
/// );
/// ```
pub fn join_image_links(document: &str, context: &str) -> String {
    LinkMode::Join.apply(document, context).content
}

/// Join-mode rewrite of a single target.
pub fn join_target<'a>(target: &'a str, context: &str) -> Cow<'a, str> {
    if classify_target(target) == TargetKind::External {
        return Cow::Borrowed(target);
    }
    let joined = match (context.is_empty(), target.is_empty()) {
        (true, _) => target.to_string(),
        (false, true) => context.to_string(),
        (false, false) => format!("{context}/{target}"),
    };
    Cow::Owned(normalize_posix(&joined))
}

/// POSIX-style lexical normalisation: collapse repeated slashes, drop `.`
/// segments and resolve `..` against the preceding segment.
fn normalize_posix(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let trailing_slash = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` above the root of an absolute path is dropped
                _ if absolute => {}
                _ => segments.push(".."),
            },
            s => segments.push(s),
        }
    }

    let mut out = segments.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() {
        out.push('.');
    }
    if trailing_slash && !out.ends_with('/') {
        out.push('/');
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────────────────
